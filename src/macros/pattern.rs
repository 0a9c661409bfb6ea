//! Structural pattern matching over syntax trees.
//!
//! Patterns are ordinary trees. A leaf whose data is `_` is a wildcard: it
//! matches any subtree and captures it. Everything else must agree on data
//! and child count, recursing positionally. There is no backtracking; the
//! pattern grammar is purely positional, so a mismatch anywhere is final.

use crate::syntax::SynNode;

/// Matches `pattern` against `subject`.
///
/// Returns the subtrees captured by wildcards in traversal order, or `None`
/// on any structural mismatch. Neither tree is modified, and repeated calls
/// return the same captures.
pub fn try_match(pattern: &SynNode, subject: &SynNode) -> Option<Vec<SynNode>> {
    let mut captures = Vec::new();
    if match_node(pattern, subject, &mut captures) {
        Some(captures)
    } else {
        None
    }
}

fn match_node(pattern: &SynNode, subject: &SynNode, captures: &mut Vec<SynNode>) -> bool {
    if pattern.data == "_" {
        captures.push(subject.clone());
        return true;
    }
    if pattern.data != subject.data || pattern.children.len() != subject.children.len() {
        return false;
    }
    pattern
        .children
        .iter()
        .zip(&subject.children)
        .all(|(p, s)| match_node(p, s, captures))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Syntax;

    #[test]
    fn wildcard_captures_whole_subtree() {
        let pattern = Syntax::leaf("_");
        let subject = Syntax::node("+", vec![Syntax::leaf("x"), Syntax::leaf("1")]);
        let captures = try_match(&pattern, &subject).unwrap();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0], subject);
    }

    #[test]
    fn arity_mismatch_fails() {
        let pattern = Syntax::node("+", vec![Syntax::leaf("_")]);
        let subject = Syntax::node("+", vec![Syntax::leaf("x"), Syntax::leaf("1")]);
        assert!(try_match(&pattern, &subject).is_none());
    }
}
