//! Operator-precedence parser over the lexer's ribbon.
//!
//! Parsing is three ordered passes, each a flat loop over work lists the
//! lexer already built; nothing here re-scans source text.
//!
//! - **Pass A** visits each precedence group from highest to lowest and folds
//!   every candidate node according to its syntactic role. Right-associative
//!   groups are visited right-to-left so that nested prefixes and dangling
//!   `else` bind correctly.
//! - **Pass B** restores a single root: any node still holding a `next` link
//!   is a statement without an explicit separator, so it is wrapped in an
//!   inferred-semicolon node (`i;`) that absorbs everything to its right.
//!   Nodes are visited in reverse creation order over a snapshot of the
//!   arena, so wrappers created mid-pass are not revisited.
//! - **Pass C** collapses the double nesting left by invocation
//!   reclassification, so `()` and `[]` nodes directly own their argument
//!   list.

use crate::diagnostics::GraftError;
use crate::syntax::lexer::{lex, NodeId, Ribbon};
use crate::syntax::tables::{
    is_block_boundary, BINARY, CONTINUATIONS, GROUP_RIGHT_TO_LEFT, OPERATORS, OPTIONAL_RIGHT,
    POSTFIX, PREFIX, REDUCE_ORDER, UNTIL_BLOCK, VALUE_DISALLOWING,
};
use crate::syntax::{SynNode, Syntax};

/// Parses source text into a rooted, immutable syntax tree.
///
/// Input is assumed well-formed; the only failure mode is the lexer's stall
/// guard. Empty input parses to an empty inferred-semicolon node.
pub fn parse(source: &str) -> Result<SynNode, GraftError> {
    let mut ribbon = lex(source)?;
    if ribbon.is_empty() {
        return Ok(Syntax::leaf("i;"));
    }
    let invocations = fold_operators(&mut ribbon);
    infer_semicolons(&mut ribbon);
    collapse_invocations(&mut ribbon, &invocations);
    let root = ribbon.root_from(0);
    Ok(ribbon.freeze(root))
}

// ============================================================================
// PASS A: OPERATOR FOLDING
// ============================================================================

fn fold_operators(ribbon: &mut Ribbon) -> Vec<NodeId> {
    let mut invocations = Vec::new();
    for group in 0..REDUCE_ORDER.len() {
        let candidates = ribbon.fold_index[group].clone();
        if GROUP_RIGHT_TO_LEFT[group] {
            for &id in candidates.iter().rev() {
                fold_candidate(ribbon, id, &mut invocations);
            }
        } else {
            for &id in candidates.iter() {
                fold_candidate(ribbon, id, &mut invocations);
            }
        }
    }
    invocations
}

fn fold_candidate(ribbon: &mut Ribbon, id: NodeId, invocations: &mut Vec<NodeId>) {
    let data = ribbon.nodes[id].data.clone();

    // A keyword directly before `:` is an object-literal key, not a
    // construct; leave it alone.
    if data.as_bytes().first().is_some_and(u8::is_ascii_alphabetic) {
        if let Some(r) = ribbon.nodes[id].next {
            if ribbon.nodes[r].data == ":" {
                return;
            }
        }
    }

    if data == "?" {
        fold_ternary(ribbon, id);
    } else if data == "(" || data == "[" {
        maybe_reclassify_invocation(ribbon, id, &data, invocations);
    } else if let Some(&limit) = UNTIL_BLOCK.get(data.as_str()) {
        grab_until_block(ribbon, id, &data, limit);
    } else if OPTIONAL_RIGHT.contains(&data) {
        if let Some(r) = ribbon.nodes[id].next {
            if ribbon.nodes[r].data != ";" {
                ribbon.fold_right(id);
            }
        }
    } else if BINARY.contains(&data) {
        if ribbon.nodes[id].prev.is_some() {
            ribbon.fold_left(id);
        }
        if ribbon.nodes[id].next.is_some() {
            ribbon.fold_right(id);
        }
    } else if PREFIX.contains(&data) {
        if ribbon.nodes[id].next.is_some() {
            ribbon.fold_right(id);
        }
    } else if POSTFIX.contains(&data) && ribbon.nodes[id].prev.is_some() {
        ribbon.fold_left(id);
    }
}

/// The lexed `?` group already holds the consequent; folding pulls in the
/// condition and the alternative, and the swap puts the condition first.
fn fold_ternary(ribbon: &mut Ribbon, id: NodeId) {
    if ribbon.nodes[id].prev.is_some() {
        ribbon.fold_left(id);
    }
    if ribbon.nodes[id].next.is_some() {
        ribbon.fold_right(id);
    }
    if ribbon.nodes[id].children.len() >= 2 {
        ribbon.nodes[id].children.swap(0, 1);
    }
}

/// A `(` or `[` with a value to its left is an invocation or dereference.
/// The bracket node is replaced in the ribbon by a compound `()` / `[]` node
/// owning the callee and the bracket group.
fn maybe_reclassify_invocation(
    ribbon: &mut Ribbon,
    id: NodeId,
    data: &str,
    invocations: &mut Vec<NodeId>,
) {
    let Some(callee) = ribbon.nodes[id].prev else {
        return;
    };
    let callee_data = ribbon.nodes[callee].data.clone();
    let eligible = callee_data == "."
        || (!OPERATORS.contains(&callee_data) && !VALUE_DISALLOWING.contains(&callee_data));
    if !eligible {
        return;
    }

    let compound = ribbon.push(if data == "(" { "()" } else { "[]" });
    let outer_prev = ribbon.nodes[callee].prev;
    let outer_next = ribbon.nodes[id].next;
    ribbon.nodes[compound].prev = outer_prev;
    ribbon.nodes[compound].next = outer_next;
    ribbon.nodes[compound].parent = ribbon.nodes[id].parent;
    if let Some(p) = outer_prev {
        ribbon.nodes[p].next = Some(compound);
    }
    if let Some(n) = outer_next {
        ribbon.nodes[n].prev = Some(compound);
    }
    for &taken in &[callee, id] {
        ribbon.nodes[taken].prev = None;
        ribbon.nodes[taken].next = None;
        ribbon.reparent(taken, Some(compound));
    }
    ribbon.nodes[compound].children = vec![callee, id];
    invocations.push(compound);
}

/// Folds right siblings until the block body is absorbed, then absorbs the
/// construct's continuation if present. A `;` between a non-block body and
/// the continuation (`if (c) x; else y`) is absorbed and discarded.
fn grab_until_block(ribbon: &mut Ribbon, id: NodeId, data: &str, limit: usize) {
    let mut taken = 0;
    while taken < limit {
        let Some(r) = ribbon.nodes[id].next else {
            return;
        };
        if is_block_boundary(&ribbon.nodes[r].data) {
            break;
        }
        ribbon.fold_right(id);
        taken += 1;
    }
    if let Some(r) = ribbon.nodes[id].next {
        if ribbon.nodes[r].data != ";" {
            ribbon.fold_right(id);
        }
    }
    let Some(&continuation) = CONTINUATIONS.get(data) else {
        return;
    };
    let Some(r) = ribbon.nodes[id].next else {
        return;
    };
    if ribbon.nodes[r].data == continuation {
        ribbon.fold_right(id);
    } else if ribbon.nodes[r].data == ";" {
        let follows = ribbon.nodes[r]
            .next
            .is_some_and(|rr| ribbon.nodes[rr].data == continuation);
        if follows {
            ribbon.fold_right(id);
            ribbon.nodes[id].children.pop();
            ribbon.fold_right(id);
        }
    }
}

// ============================================================================
// PASS B: INFERRED SEMICOLONS
// ============================================================================

fn infer_semicolons(ribbon: &mut Ribbon) {
    let created = ribbon.nodes.len();
    for id in (0..created).rev() {
        if ribbon.nodes[id].next.is_some() {
            let wrapper = ribbon.wrap(id, "i;");
            // absorb the whole right side: a reclassified node created after
            // its left neighbor may be reached wrapper-first, so stopping at
            // one sibling could leave the wrapper itself with a stray link
            while ribbon.nodes[wrapper].next.is_some() {
                ribbon.fold_right(wrapper);
            }
        }
    }
}

// ============================================================================
// PASS C: INVOCATION CLEANUP
// ============================================================================

/// After folding, an invocation has the shape `()[callee, group]` where the
/// group node wraps the argument list. Replace the group with its content so
/// the invocation owns the arguments directly; an empty group is dropped.
fn collapse_invocations(ribbon: &mut Ribbon, invocations: &[NodeId]) {
    for &id in invocations {
        let bracket = ribbon.nodes[id].children[1];
        match ribbon.nodes[bracket].children.first().copied() {
            Some(head) => {
                let content = ribbon.resolve(head, bracket);
                ribbon.reparent(content, Some(id));
                ribbon.nodes[id].children[1] = content;
            }
            None => {
                ribbon.nodes[id].children.pop();
            }
        }
    }
}
