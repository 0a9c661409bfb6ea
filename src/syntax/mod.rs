//! Syntax tree data model.
//!
//! A node is nothing but a `data` string and an ordered child list; its
//! syntactic role (binary operator, invocation, literal, block construct) is
//! decided entirely by looking `data` up in the static tables of
//! [`tables`]. String and regex literals keep their delimiters in `data`,
//! value-position unary operators keep their `u` prefix, and two synthetic
//! forms appear only in parsed trees: `i;` for inferred statement boundaries
//! and `()` / `[]` for invocation and dereference compounds.
//!
//! Parsed trees are immutable for consumers: rewrites such as [`rmap`] and
//! [`substitute`] build new nodes and share unchanged subtrees through `Arc`.
//! The mutable doubly-linked form that exists during parsing lives in the
//! lexer's ribbon arena and never escapes [`parse`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;

mod lexer;
pub mod parser;
pub mod serializer;
pub mod tables;

pub use parser::parse;
pub use serializer::to_source;

/// A byte range in source text, carried by diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Shared handle to a syntax node.
pub type SynNode = Arc<Syntax>;

/// A node in the syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Syntax {
    /// Token text: operator glyph, keyword, identifier, or literal text
    /// including its delimiters.
    pub data: String,
    /// Ordered children. Fixed after parsing; grown by append during
    /// programmatic construction.
    pub children: Vec<SynNode>,
}

impl Syntax {
    /// A childless node.
    pub fn leaf(data: impl Into<String>) -> SynNode {
        Arc::new(Syntax {
            data: data.into(),
            children: Vec::new(),
        })
    }

    /// A node with the given children.
    pub fn node(data: impl Into<String>, children: Vec<SynNode>) -> SynNode {
        Arc::new(Syntax {
            data: data.into(),
            children,
        })
    }

    // ------------------------------------------------------------------------
    // Tree primitives
    // ------------------------------------------------------------------------

    /// Appends a child.
    pub fn push_child(&mut self, child: SynNode) {
        self.children.push(child);
    }

    /// Removes and returns the last child.
    pub fn pop_child(&mut self) -> Option<SynNode> {
        self.children.pop()
    }

    /// Replaces the child at `index`.
    ///
    /// # Panics
    /// Panics when `index` is out of bounds; an invalid index is an invariant
    /// violation, not a recoverable condition.
    pub fn replace_child(&mut self, index: usize, child: SynNode) {
        self.children[index] = child;
    }

    // ------------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------------

    /// Applies `f` to each direct child.
    pub fn each(&self, mut f: impl FnMut(&SynNode)) {
        for child in &self.children {
            f(child);
        }
    }

    /// Shallow map: a new node with each child replaced by `f(child)`.
    pub fn map(&self, mut f: impl FnMut(&SynNode) -> SynNode) -> SynNode {
        Arc::new(Syntax {
            data: self.data.clone(),
            children: self.children.iter().map(|c| f(c)).collect(),
        })
    }

    /// Recursive visit of this node and every descendant, allocating nothing.
    pub fn reach(&self, f: &mut impl FnMut(&Syntax)) {
        f(self);
        for child in &self.children {
            child.reach(f);
        }
    }

    // ------------------------------------------------------------------------
    // Role predicates
    // ------------------------------------------------------------------------

    /// String literal, delimiters included in `data`.
    pub fn is_string(&self) -> bool {
        matches!(self.data.as_bytes().first().copied(), Some(b'"') | Some(b'\''))
    }

    /// Numeric literal: decimal, hex, octal, or a leading-dot fraction.
    pub fn is_number(&self) -> bool {
        let bytes = self.data.as_bytes();
        match bytes.first().copied() {
            Some(b) if b.is_ascii_digit() => true,
            Some(b'.') => bytes.get(1).is_some_and(|d| d.is_ascii_digit()),
            _ => false,
        }
    }

    pub fn is_boolean(&self) -> bool {
        self.data == "true" || self.data == "false"
    }

    /// Regex literal: slash-delimited and longer than the division operator.
    pub fn is_regex(&self) -> bool {
        self.data.len() > 1 && self.data.starts_with('/') && !self.data.starts_with("//")
    }

    pub fn is_constant(&self) -> bool {
        self.is_string()
            || self.is_number()
            || self.is_boolean()
            || self.is_regex()
            || self.data == "null"
            || self.data == "undefined"
    }

    /// Plain identifier: identifier-shaped and not a word operator.
    pub fn is_identifier(&self) -> bool {
        let bytes = self.data.as_bytes();
        !bytes.is_empty()
            && tables::in_class(&tables::IDENT_START, bytes[0])
            && bytes.iter().all(|&b| tables::in_class(&tables::IDENT, b))
            && !tables::OPERATORS.contains(&self.data)
    }

    /// A `{ ... }` block.
    pub fn is_block(&self) -> bool {
        self.data == "{"
    }

    /// A parenthesized group whose sole content is a block, e.g. the shape of
    /// a guarded function literal `(function () { ... })`.
    pub fn has_grouped_block(&self) -> bool {
        self.data == "(" && self.children.len() == 1 && self.children[0].is_block()
    }

    pub fn is_invocation(&self) -> bool {
        self.data == "()"
    }

    pub fn is_dereference(&self) -> bool {
        self.data == "[]"
    }

    /// An invocation whose callee is a dereference, e.g. `a.b(x)`. Such a
    /// call binds its receiver and cannot be eta-reduced to the bare method.
    pub fn is_contextualized_invocation(&self) -> bool {
        self.is_invocation()
            && self
                .children
                .first()
                .is_some_and(|callee| callee.data == ".")
    }

    // ------------------------------------------------------------------------
    // Literal accessors
    // ------------------------------------------------------------------------

    /// Numeric value of a number literal, honoring hex and octal prefixes.
    pub fn as_number(&self) -> Option<f64> {
        let text = self.data.as_str();
        if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            return u64::from_str_radix(hex, 16).ok().map(|n| n as f64);
        }
        if text.len() > 1
            && text.starts_with('0')
            && text.bytes().all(|b| b.is_ascii_digit())
        {
            return u64::from_str_radix(&text[1..], 8).ok().map(|n| n as f64);
        }
        text.parse::<f64>().ok()
    }

    /// Content of a string literal with delimiters stripped and standard
    /// escapes processed.
    pub fn as_unescaped_string(&self) -> Option<String> {
        if !self.is_string() || self.data.len() < 2 {
            return None;
        }
        let body = &self.data[1..self.data.len() - 1];
        let mut out = String::with_capacity(body.len());
        let mut chars = body.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('0') => out.push('\0'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        }
        Some(out)
    }

    /// Body of a regex literal, without delimiters or trailing flags.
    pub fn as_unescaped_regex(&self) -> Option<&str> {
        if !self.is_regex() {
            return None;
        }
        let end = self.data.rfind('/')?;
        Some(&self.data[1..end])
    }
}

impl std::fmt::Display for Syntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&serializer::to_source(self))
    }
}

// ============================================================================
// RECURSIVE REWRITING
// ============================================================================

/// Recursive map with replacement cutoff.
///
/// Invokes `f` on `node`. When `f` returns a distinct node, that node takes
/// this one's place and recursion does **not** descend into it. When `f`
/// returns the node itself or `None`, recursion descends into the children.
/// Unchanged subtrees are shared, not copied.
pub fn rmap<F>(node: &SynNode, f: &mut F) -> SynNode
where
    F: FnMut(&SynNode) -> Option<SynNode>,
{
    if let Some(replacement) = f(node) {
        if !Arc::ptr_eq(&replacement, node) {
            return replacement;
        }
    }
    let mut changed = false;
    let children: Vec<SynNode> = node
        .children
        .iter()
        .map(|child| {
            let mapped = rmap(child, f);
            changed |= !Arc::ptr_eq(&mapped, child);
            mapped
        })
        .collect();
    if changed {
        Arc::new(Syntax {
            data: node.data.clone(),
            children,
        })
    } else {
        node.clone()
    }
}

/// Replaces each leaf whose data equals `key` with successive entries of
/// `replacements`, cycling modulo its length. A single replacement therefore
/// substitutes every occurrence uniformly. The input tree is never modified.
pub fn substitute(node: &SynNode, key: &str, replacements: &[SynNode]) -> SynNode {
    if replacements.is_empty() {
        return node.clone();
    }
    let mut next = 0usize;
    rmap(node, &mut |n| {
        if n.children.is_empty() && n.data == key {
            let replacement = replacements[next % replacements.len()].clone();
            next += 1;
            Some(replacement)
        } else {
            None
        }
    })
}

/// Collapses a chain of the binary operator at `node` into a single variadic
/// node with the operands in left-to-right source order. Works identically
/// for left- and right-associative chains: both are in-order walks.
pub fn flatten(node: &SynNode) -> SynNode {
    fn collect(n: &SynNode, op: &str, out: &mut Vec<SynNode>) {
        if n.data == op && n.children.len() == 2 {
            collect(&n.children[0], op, out);
            collect(&n.children[1], op, out);
        } else {
            out.push(n.clone());
        }
    }
    let mut operands = Vec::new();
    collect(node, &node.data, &mut operands);
    Arc::new(Syntax {
        data: node.data.clone(),
        children: operands,
    })
}
