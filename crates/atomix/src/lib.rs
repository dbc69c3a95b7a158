//! # atomix - atomic CSS rule compiler
//!
//! Compiles nested, conditional style objects into a minimal set of atomic
//! class rules, each placed in the right cascade layer.
//!
//! ## Quick Start
//!
//! ```rust
//! use atomix::{AtomicRule, ProcessOptions, StylesheetContext};
//! use serde_json::json;
//!
//! let mut context = StylesheetContext::default();
//! let mut rule = AtomicRule::new(&mut context, None);
//! rule.process_atomic(ProcessOptions::new(json!({ "color": "red" })));
//!
//! assert_eq!(
//!     rule.to_css(),
//!     "@layer reset, base, tokens, recipes, utilities;\n\n\
//!      @layer utilities {\n  .color_red {\n    color: red;\n  }\n}"
//! );
//! ```
//!
//! ## Pipeline
//!
//! 1. [`normalize_style_object`] expands responsive arrays and shorthands
//! 2. [`walk_object`] visits each leaf with its key path
//! 3. [`Conditions`] splits the path into property and canonical conditions
//! 4. The transform hook ([`Utility`] or an injected [`TransformFn`]) yields
//!    the class token and declarations
//! 5. [`hash_fn`] derives the selector name
//! 6. The rule is appended to a [`Layer`]; identical selectors collapse
//!
//! ## Modules
//!
//! - [`conditions`]: condition registry and canonical ordering
//! - [`context`]: session configuration and shared state
//! - [`hash`]: class name hashing and escaping
//! - [`layers`]: cascade layers
//! - [`normalize`]: walking and normalizing style objects
//! - [`rule`]: the compiler
//! - [`utility`]: the transform hook

pub mod conditions;
pub mod context;
pub mod error;
pub mod hash;
pub mod layers;
pub mod normalize;
pub mod rule;
pub mod utility;

pub use conditions::{ConditionDetails, ConditionKind, Conditions};
pub use context::{ContextOptions, StylesheetContext};
pub use error::{AtomixError, CssSyntaxError};
pub use hash::{esc, hash_fn, to_hash};
pub use layers::{Layer, LayerEntry, LayerName, LayerRegistry};
pub use normalize::{normalize_style_object, walk_object};
pub use rule::{AtomicRule, ProcessOptions};
pub use utility::{TransformFn, TransformResult, Utility, UtilityConfig};
