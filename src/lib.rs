//! # atomix-rs
//!
//! Atomic CSS generation: nested, conditional style objects in, deduplicated
//! class rules in cascade layers out.
//!
//! This crate re-exports the two workspace members:
//!
//! - [`atomix`]: the rule compiler, condition registry, hashing and layers
//! - [`css`]: the style object emitter and CSS syntax validation
//!
//! ```rust
//! use atomix_rs::{AtomicRule, ContextOptions, ProcessOptions, StylesheetContext};
//! use serde_json::json;
//!
//! let options = ContextOptions { hash: true, ..Default::default() };
//! let mut context = StylesheetContext::new(options).unwrap();
//! let mut rule = AtomicRule::new(&mut context, Some("utilities"));
//! rule.process_atomic(ProcessOptions::new(json!({ "color": { "_hover": "red" } })));
//!
//! let class = atomix_rs::to_hash("hover:color_red");
//! assert!(rule.to_css().contains(&format!(".{class}:hover {{")));
//! ```

pub use atomix::*;
pub use atomix_css as css;
