//! Static token classification tables.
//!
//! Nodes have no subclasses; every syntactic role is decided by looking the
//! node's `data` up in the tables below. Each table records its longest key
//! so membership tests can short-circuit on candidates that are too long to
//! possibly match, and the character-class tables are plain boolean arrays
//! indexed by character code so the lexer never calls into Unicode machinery.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

// ============================================================================
// TOKEN SETS AND MAPS
// ============================================================================

/// A hashed set of token strings that remembers its longest entry.
#[derive(Debug)]
pub struct TokenSet {
    entries: HashSet<&'static str>,
    max_len: usize,
}

impl TokenSet {
    fn new(spaced: &'static str) -> Self {
        let entries: HashSet<&'static str> = spaced.split_whitespace().collect();
        let max_len = entries.iter().map(|t| t.len()).max().unwrap_or(0);
        Self { entries, max_len }
    }

    /// O(1) membership test, short-circuiting on over-long candidates.
    pub fn contains(&self, token: &str) -> bool {
        token.len() <= self.max_len && self.entries.contains(token)
    }

    /// Length of the longest token in the set.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

fn token_map(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
    pairs.iter().copied().collect()
}

// ============================================================================
// OPERATOR CLASSIFICATION
// ============================================================================

/// Every operator the lexer can emit, punctuation and word forms alike.
/// Word operators matter twice: an identifier found here is an operator
/// token, and an operator token never terminates a value for the purpose of
/// regex/division disambiguation.
pub static OPERATORS: LazyLock<TokenSet> = LazyLock::new(|| {
    TokenSet::new(
        ". , : ; ? + - * / % < > <= >= << >> >>> <<= >>= >>>= \
         == != === !== = += -= *= /= %= &= |= ^= & | ^ ! ~ && || ++ -- >$> \
         typeof instanceof in new delete void function if else for with \
         while do try catch finally return throw break continue var const",
    )
});

/// Precedence groups, highest first. A token's position in this list is its
/// reduce index; folding proceeds group by group from index 0 down.
const REDUCE_GROUPS: &[&str] = &[
    "function",
    "( [ . [] ()",
    "new delete void",
    "u++ u-- ++ -- utypeof u~ u! u+ u-",
    "* / %",
    "+ -",
    "<< >> >>>",
    "< > <= >= instanceof in",
    "== != === !==",
    "&",
    "^",
    "|",
    "&&",
    "||",
    "?",
    "= += -= *= /= %= &= |= ^= <<= >>= >>>= >$>",
    ":",
    ",",
    "return throw break continue",
    "var const",
    "if else try catch finally for with while do",
    ";",
];

pub static REDUCE_ORDER: LazyLock<Vec<TokenSet>> =
    LazyLock::new(|| REDUCE_GROUPS.iter().map(|&g| TokenSet::new(g)).collect());

/// Token to reduce index.
pub static REDUCE_INDEX: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    let mut index = HashMap::new();
    for (i, group) in REDUCE_GROUPS.iter().enumerate() {
        for token in group.split_whitespace() {
            index.insert(token, i);
        }
    }
    index
});

/// Tokens folded right-to-left within their group. A group's direction is
/// decided by its first listed token.
pub static ASSOCIATES_RIGHT: LazyLock<TokenSet> = LazyLock::new(|| {
    TokenSet::new(
        "= += -= *= /= %= &= |= ^= <<= >>= >>>= >$> \
         u+ u- u! u~ u++ u-- utypeof typeof new delete void ? : \
         return throw break continue var const \
         if else try catch finally for with while do",
    )
});

/// Per-group iteration direction, precomputed from [`ASSOCIATES_RIGHT`].
pub static GROUP_RIGHT_TO_LEFT: LazyLock<Vec<bool>> = LazyLock::new(|| {
    REDUCE_GROUPS
        .iter()
        .map(|g| {
            g.split_whitespace()
                .next()
                .is_some_and(|t| ASSOCIATES_RIGHT.contains(t))
        })
        .collect()
});

// ============================================================================
// FOLD ROLES
// ============================================================================

/// Binary operators: fold left, then right.
pub static BINARY: LazyLock<TokenSet> = LazyLock::new(|| {
    TokenSet::new(
        ". * / % + - << >> >>> < > <= >= instanceof in == != === !== \
         & ^ | && || = += -= *= /= %= &= |= ^= <<= >>= >>>= >$> : , ;",
    )
});

/// Prefix unary operators: fold right only.
pub static PREFIX: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::new("u+ u- u! u~ u++ u-- utypeof typeof new delete void var const"));

/// Postfix unary operators: fold left only.
pub static POSTFIX: LazyLock<TokenSet> = LazyLock::new(|| TokenSet::new("++ --"));

/// Keywords that fold their right sibling only when it is not `;`.
pub static OPTIONAL_RIGHT: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::new("return throw break continue else finally"));

/// Keywords that fold right siblings until a block body is absorbed, with the
/// maximum number of non-block siblings each may take first. `function` takes
/// up to two: an optional name and the parameter parens.
pub static UNTIL_BLOCK: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    [
        ("function", 2),
        ("if", 1),
        ("do", 1),
        ("try", 1),
        ("catch", 1),
        ("for", 1),
        ("with", 1),
        ("while", 1),
    ]
    .into_iter()
    .collect()
});

/// Group opener to its expected closer.
pub static GROUP_CLOSERS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| token_map(&[("(", ")"), ("[", "]"), ("{", "}"), ("?", ":")]));

/// Block-construct continuations: after a keyword absorbs its body, a right
/// sibling with the mapped data is absorbed as well.
pub static CONTINUATIONS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    token_map(&[
        ("if", "else"),
        ("do", "while"),
        ("try", "catch"),
        ("catch", "finally"),
    ])
});

/// Keywords after which a `(` or `[` can never be an invocation.
pub static VALUE_DISALLOWING: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::new("function if for while catch"));

/// Keywords whose parenthesized head is followed by a statement, flipping the
/// lexer back to value-expected mode after the close paren.
pub static BLOCK_KEYWORDS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::new("if for while with do catch function"));

/// Operators that take a `u` prefix when lexed in value-expected position.
pub static UNARY_VARIANTS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    token_map(&[
        ("+", "u+"),
        ("-", "u-"),
        ("!", "u!"),
        ("~", "u~"),
        ("++", "u++"),
        ("--", "u--"),
        ("typeof", "utypeof"),
    ])
});

/// Reverse of [`UNARY_VARIANTS`], used by the serializer.
pub static UNARY_RENDER: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    token_map(&[
        ("u+", "+"),
        ("u-", "-"),
        ("u!", "!"),
        ("u~", "~"),
        ("u++", "++"),
        ("u--", "--"),
        ("utypeof", "typeof"),
    ])
});

/// True when `data` opens a lexical group.
pub fn is_group_opener(data: &str) -> bool {
    GROUP_CLOSERS.contains_key(data)
}

/// True when `data` terminates the right-sibling scan of an until-block fold:
/// a block body or an explicit statement boundary.
pub fn is_block_boundary(data: &str) -> bool {
    data == "{" || data == ";"
}

// ============================================================================
// CHARACTER CLASSES
// ============================================================================

/// Builds a 128-entry boolean table from a byte list.
const fn class_of(chars: &[u8]) -> [bool; 128] {
    let mut table = [false; 128];
    let mut i = 0;
    while i < chars.len() {
        table[chars[i] as usize] = true;
        i += 1;
    }
    table
}

/// Builds a 128-entry boolean table from inclusive byte ranges plus extras.
const fn class_of_ranges(ranges: &[(u8, u8)], extras: &[u8]) -> [bool; 128] {
    let mut table = class_of(extras);
    let mut r = 0;
    while r < ranges.len() {
        let (lo, hi) = ranges[r];
        let mut b = lo;
        while b <= hi {
            table[b as usize] = true;
            b += 1;
        }
        r += 1;
    }
    table
}

pub const WHITESPACE: [bool; 128] = class_of(b" \t\n\r\x0b\x0c");
pub const EOL: [bool; 128] = class_of(b"\n\r");
pub const DIGIT: [bool; 128] = class_of_ranges(&[(b'0', b'9')], &[]);
pub const HEX_DIGIT: [bool; 128] = class_of_ranges(&[(b'0', b'9'), (b'a', b'f'), (b'A', b'F')], &[]);
pub const EXPONENT: [bool; 128] = class_of(b"eE");
pub const IDENT: [bool; 128] =
    class_of_ranges(&[(b'a', b'z'), (b'A', b'Z'), (b'0', b'9')], b"_$");
pub const IDENT_START: [bool; 128] = class_of_ranges(&[(b'a', b'z'), (b'A', b'Z')], b"_$");
pub const REGEX_FLAG: [bool; 128] = class_of(b"gims");
pub const PUNCT: [bool; 128] = class_of(b"+-*/%<>=!~&|^?:;,.");
pub const OPEN_BRACKET: [bool; 128] = class_of(b"([{");
pub const CLOSE_BRACKET: [bool; 128] = class_of(b")]}");

/// Class test that tolerates non-ASCII bytes (always false).
#[inline]
pub fn in_class(table: &[bool; 128], byte: u8) -> bool {
    byte < 128 && table[byte as usize]
}
