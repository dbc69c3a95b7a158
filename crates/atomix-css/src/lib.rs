//! # atomix-css - style objects to CSS
//!
//! The CSS layer of the atomic compiler. It owns no styling decisions; it
//! turns already resolved style objects into CSS and rejects fragments that
//! would not survive a round trip through a CSS parser.
//!
//! - **Emission**: [`to_css`] converts a css-in-js object into a [`CssRoot`]
//! - **Parsing**: [`parser::parse_stylesheet`] reads raw CSS text
//! - **Errors**: every failure is a [`CssSyntaxError`] carrying the excerpt
//!
//! ## Quick Start
//!
//! ```rust
//! use atomix_css::{to_css, EmitFlags};
//! use serde_json::json;
//!
//! let styles = json!({ ".color_red": { "color": "red" } });
//! let css = to_css(styles.as_object().unwrap(), EmitFlags::empty()).unwrap();
//! assert_eq!(css.to_string(), ".color_red {\n  color: red;\n}");
//! ```
//!
//! ## Modules
//!
//! - [`ast`]: rules, at-rules and declarations
//! - [`emit`]: object to tree conversion
//! - [`parser`]: nom grammar for selectors, values and stylesheets
//! - [`error`]: the syntax error type

pub mod ast;
pub mod emit;
pub mod error;
pub mod parser;

pub use ast::{AtRule, CssNode, CssRoot, Declaration, Rule};
pub use emit::{EmitFlags, StyleMap, hyphenate_property, is_unitless, to_css};
pub use error::CssSyntaxError;
