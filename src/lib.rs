pub use crate::diagnostics::{ErrorContext, GraftError};

pub mod compile;
pub mod diagnostics;
pub mod engine;
pub mod gensym;
pub mod macros;
pub mod syntax;

pub use crate::compile::{Binding, Bindings, CompiledSource};
pub use crate::engine::{Configuration, Engine};
pub use crate::gensym::SymbolGenerator;
pub use crate::macros::{try_match, Macro, MacroExpander};
pub use crate::syntax::{flatten, parse, rmap, substitute, to_source, SynNode, Syntax};
