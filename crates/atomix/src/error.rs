//! Error types for the atomic compiler.
//!
//! Compilation itself never fails: malformed style objects are logged and
//! skipped. These errors surface while building a [`StylesheetContext`]
//! from configuration or when a layer name has to be parsed strictly.
//!
//! [`StylesheetContext`]: crate::StylesheetContext

use thiserror::Error;

pub use atomix_css::CssSyntaxError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AtomixError {
    /// A layer name outside the fixed set of cascade layers.
    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    /// A custom condition whose value is neither a nesting selector nor an at-rule.
    #[error("Invalid condition `{name}`: {raw}")]
    InvalidCondition { name: String, raw: String },

    /// A breakpoint without a usable min-width.
    #[error("Invalid breakpoint `{name}`: {value}")]
    InvalidBreakpoint { name: String, value: String },

    /// Emitted CSS was rejected.
    #[error(transparent)]
    Syntax(#[from] CssSyntaxError),
}
