//! Environment-capturing source assembly.
//!
//! The engine never evaluates host code; `compile` produces everything an
//! external host interpreter needs to run a tree against captured values.
//! One fresh symbol names the environment, every leaf matching an
//! environment key is rerouted through a dereference of that symbol, and the
//! rewritten tree is serialized. The host arranges for the source to run as
//! the body of a one-argument function receiving the environment.
//!
//! Rewriting is purely textual on leaf data: a user binding that shadows an
//! environment name is rewritten too. Scope-aware rewriting would change
//! observable behavior and is intentionally not done here.

use crate::syntax::{rmap, to_source, SynNode, Syntax};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A host value captured into a compile environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Binding {
    /// A syntax tree, as produced by quotation.
    Syntax(SynNode),
    Text(String),
    Number(f64),
    Bool(bool),
}

/// Name-to-value map handed to `compile`.
pub type Bindings = HashMap<String, Binding>;

/// The output of `compile`: source text, the formal parameter naming the
/// environment, and the environment itself (including the engine's syntax
/// refs). The host invokes `function (formal) { source }` with the
/// environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledSource {
    pub source: String,
    pub formal: String,
    pub environment: Bindings,
}

/// Reroutes environment references and serializes.
///
/// Each leaf whose data is a key of `environment` becomes `(formal.key)`.
/// The replacement subtree is not descended into, so a key that happens to
/// equal another key's text is rewritten exactly once per occurrence.
pub(crate) fn assemble(tree: &SynNode, formal: &str, environment: &Bindings) -> String {
    let rewritten = rmap(tree, &mut |node| {
        if node.children.is_empty() && environment.contains_key(&node.data) {
            Some(Syntax::node(
                "(",
                vec![Syntax::node(
                    ".",
                    vec![Syntax::leaf(formal), Syntax::leaf(node.data.clone())],
                )],
            ))
        } else {
            None
        }
    });
    to_source(&rewritten)
}
