//! Unified, `miette`-based diagnostics for the graft engine.
//!
//! Every failure mode in the crate is represented by [`GraftError`] and is
//! constructed through the `err_msg!` or `err_ctx!` macro; the macros handle
//! context wrapping so call sites never build an [`ErrorContext`] by hand.
//!
//! There are deliberately few variants. A failed pattern match or an expander
//! that declines to rewrite is normal control flow and is modeled as `None`,
//! never as an error. The variants here are the fatal conditions: a lexer
//! iteration that consumed no input, a request for an unregistered
//! configuration pack, and internal invariant violations.

use crate::syntax::Span;
use miette::Diagnostic;
use std::sync::Arc;
use thiserror::Error;

/// Diagnostic context attached to a [`GraftError`]: optional source text,
/// span, and help message.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source text for error highlighting.
    pub src: Option<Arc<String>>,
    /// Span within the source for precise error location.
    pub span: Option<Span>,
    /// Help message for user guidance.
    pub help: Option<String>,
}

impl ErrorContext {
    /// An empty context (no source, span, or help).
    pub fn none() -> Self {
        Self::default()
    }

    /// A context with source and span.
    pub fn with_src_and_span(src: Arc<String>, span: Span) -> Self {
        Self {
            src: Some(src),
            span: Some(span),
            help: None,
        }
    }
}

/// Unified error type for all graft failure modes.
#[derive(Debug, Error, Diagnostic)]
pub enum GraftError {
    /// The lexer failed to consume a character in an iteration. This is a
    /// defensive check: it can only fire on an engine bug, never on
    /// malformed input, so it is fatal.
    #[error("lexer stall: {message}")]
    #[diagnostic(code(graft::lex))]
    Lex { message: String, ctx: ErrorContext },

    /// A configuration pack was requested that is not registered.
    #[error("unknown configuration: {message}")]
    #[diagnostic(code(graft::config))]
    Config { message: String, ctx: ErrorContext },

    /// An internal invariant was violated.
    #[error("internal error: {message}")]
    #[diagnostic(code(graft::internal))]
    Internal { message: String, ctx: ErrorContext },
}

/// Trait for extracting source text from various types for error context.
pub trait AsErrorSource {
    fn as_error_source(&self) -> String;
}

impl AsErrorSource for String {
    fn as_error_source(&self) -> String {
        self.clone()
    }
}
impl AsErrorSource for &str {
    fn as_error_source(&self) -> String {
        (*self).to_string()
    }
}
impl AsErrorSource for Arc<String> {
    fn as_error_source(&self) -> String {
        self.as_ref().clone()
    }
}

/// Converts any [`AsErrorSource`] to `Arc<String>` for use in error context.
pub fn to_error_src<S: AsErrorSource>(src: S) -> Arc<String> {
    Arc::new(src.as_error_source())
}

/// Constructs a [`GraftError`] variant with a formatted message and no context.
///
/// # Example
/// ```rust
/// use graft::err_msg;
/// let err = err_msg!(Config, "no pack named '{}'", "qz");
/// assert!(matches!(err, graft::GraftError::Config { .. }));
/// ```
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $msg:expr) => {
        $crate::GraftError::$variant {
            message: format!("{}", $msg),
            ctx: $crate::diagnostics::ErrorContext::none(),
        }
    };
    ($variant:ident, $fmt:expr, $($arg:expr),+) => {
        $crate::GraftError::$variant {
            message: format!($fmt, $($arg),+),
            ctx: $crate::diagnostics::ErrorContext::none(),
        }
    };
}

/// Constructs a [`GraftError`] variant with source/span context.
///
/// Pass `src` and `span` directly; the macro handles wrapping and conversion.
///
/// # Example
/// ```rust
/// use graft::err_ctx;
/// use graft::syntax::Span;
/// let src = "var x =".to_string();
/// let err = err_ctx!(Lex, "no progress", src, Span { start: 6, end: 7 });
/// assert!(matches!(err, graft::GraftError::Lex { .. }));
/// ```
#[macro_export]
macro_rules! err_ctx {
    ($variant:ident, $msg:expr, $src:expr, $span:expr) => {
        $crate::GraftError::$variant {
            message: format!("{}", $msg),
            ctx: $crate::diagnostics::ErrorContext::with_src_and_span(
                $crate::diagnostics::to_error_src($src),
                $span,
            ),
        }
    };
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $help:expr) => {
        $crate::GraftError::$variant {
            message: format!("{}", $msg),
            ctx: $crate::diagnostics::ErrorContext {
                src: Some($crate::diagnostics::to_error_src($src)),
                span: Some($span),
                help: Some(format!("{}", $help)),
            },
        }
    };
}
