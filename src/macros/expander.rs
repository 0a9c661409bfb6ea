//! Macro expansion.
//!
//! A macro pairs a pattern tree with an expander. Expanders come in two
//! kinds, mirroring the engine's template/native split: a template tree whose
//! `_` leaves are filled positionally from the captures, or a host callable
//! that may consult and mutate the engine (register further macros, allocate
//! fresh symbols, stash syntax refs).
//!
//! Expansion is a single recursive pass with a replacement cutoff: when a
//! macro fires on a node, the replacement takes the node's place and the
//! pass does **not** descend into it. An expander returning `None` declines,
//! and the next registered macro gets its chance; registration order is
//! priority order. Recursive macros (`rmacro`) differ only in that their
//! replacement is immediately expanded again before being spliced in, so
//! shorthand that expands to more shorthand keeps reducing.
//!
//! The registry is snapshotted at each node, not once per pass. The
//! snapshot is a persistent-vector clone, so this costs a refcount bump, and
//! it means a macro registered mid-pass (the meta-macro case) is live for
//! every node visited afterward.

use crate::engine::Engine;
use crate::macros::pattern::try_match;
use crate::syntax::{substitute, SynNode, Syntax};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Host callable invoked with the engine and the pattern's captures.
pub type NativeExpander = Rc<dyn Fn(&mut Engine, &[SynNode]) -> Option<SynNode>>;

/// How a macro produces its replacement.
#[derive(Clone)]
pub enum MacroExpander {
    /// Template tree; captures replace successive `_` leaves.
    Template(SynNode),
    /// Host callable; returning `None` declines to rewrite.
    Native(NativeExpander),
}

impl MacroExpander {
    /// Wraps a closure as a native expander.
    pub fn native(f: impl Fn(&mut Engine, &[SynNode]) -> Option<SynNode> + 'static) -> Self {
        MacroExpander::Native(Rc::new(f))
    }
}

impl fmt::Debug for MacroExpander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroExpander::Template(body) => f.debug_tuple("Template").field(body).finish(),
            MacroExpander::Native(_) => f.write_str("Native(..)"),
        }
    }
}

/// A registered rewrite rule.
#[derive(Debug, Clone)]
pub struct Macro {
    pub pattern: SynNode,
    pub expander: MacroExpander,
    /// Recursive macros re-expand their own output before splicing it in.
    pub recursive: bool,
}

/// Expands `node` against the engine's registry, returning the rewritten
/// tree. The input is never modified; unchanged subtrees are shared.
pub(crate) fn expand(engine: &mut Engine, node: &SynNode) -> SynNode {
    let macros = engine.macro_snapshot();
    for rule in macros.iter() {
        let Some(captures) = try_match(&rule.pattern, node) else {
            continue;
        };
        let Some(replacement) = apply(engine, &rule.expander, &captures) else {
            continue;
        };
        return if rule.recursive {
            expand(engine, &replacement)
        } else {
            replacement
        };
    }
    // No macro fired: keep this node and visit its children.
    let mut changed = false;
    let children: Vec<SynNode> = node
        .children
        .iter()
        .map(|child| {
            let expanded = expand(engine, child);
            changed |= !Arc::ptr_eq(&expanded, child);
            expanded
        })
        .collect();
    if changed {
        Syntax::node(node.data.clone(), children)
    } else {
        node.clone()
    }
}

fn apply(engine: &mut Engine, expander: &MacroExpander, captures: &[SynNode]) -> Option<SynNode> {
    match expander {
        MacroExpander::Template(body) => Some(substitute(body, "_", captures)),
        MacroExpander::Native(f) => {
            let f = f.clone();
            f.as_ref()(engine, captures)
        }
    }
}
