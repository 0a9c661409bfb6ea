//! Pattern matching and macro expansion.

pub mod expander;
pub(crate) mod packs;
pub mod pattern;

pub use expander::{Macro, MacroExpander, NativeExpander};
pub use pattern::try_match;
