//! The per-session stylesheet context.
//!
//! A [`StylesheetContext`] is built once per compilation session from
//! [`ContextOptions`]. It owns the condition registry, the utility transform,
//! the hashing flag and the [`LayerRegistry`] that compiled rules are
//! appended to. Starting a new session means building a new context.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::conditions::{Conditions, DEFAULT_BREAKPOINTS};
use crate::error::AtomixError;
use crate::layers::{LayerName, LayerRegistry};
use crate::utility::{TransformFn, TransformResult, Utility, UtilityConfig};

/// Session configuration.
///
/// ```rust
/// use atomix::ContextOptions;
///
/// let options: ContextOptions = serde_json::from_str(r#"{
///     "hash": true,
///     "prefix": "ax",
///     "conditions": { "_checked": "&[data-state=checked]" }
/// }"#).unwrap();
/// assert!(options.hash);
/// assert_eq!(options.separator, "_");
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ContextOptions {
    /// Emit hashed class names instead of readable ones.
    pub hash: bool,
    /// Prefix for every generated class name.
    pub prefix: Option<String>,
    /// Separator between a utility's class name and its value.
    pub separator: String,
    /// Breakpoint name to min-width.
    pub breakpoints: BTreeMap<String, String>,
    /// Custom condition name to raw selector or at-rule.
    pub conditions: BTreeMap<String, String>,
    pub utilities: BTreeMap<String, UtilityConfig>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            hash: false,
            prefix: None,
            separator: "_".to_string(),
            breakpoints: DEFAULT_BREAKPOINTS
                .iter()
                .map(|(name, width)| (name.to_string(), width.to_string()))
                .collect(),
            conditions: BTreeMap::new(),
            utilities: BTreeMap::new(),
        }
    }
}

pub struct StylesheetContext {
    pub conditions: Conditions,
    pub utility: Utility,
    pub hash: bool,
    /// Overrides [`Utility::transform`] when set.
    pub transform: Option<TransformFn>,
    pub layers: LayerRegistry,
}

impl Default for StylesheetContext {
    fn default() -> Self {
        Self {
            conditions: Conditions::default(),
            utility: Utility::default(),
            hash: false,
            transform: None,
            layers: LayerRegistry::new(),
        }
    }
}

impl StylesheetContext {
    pub fn new(options: ContextOptions) -> Result<Self, AtomixError> {
        let ContextOptions {
            hash,
            prefix,
            separator,
            breakpoints,
            conditions,
            utilities,
        } = options;

        Ok(Self {
            conditions: Conditions::new(breakpoints, conditions)?,
            utility: Utility::new(prefix, separator, utilities),
            hash,
            transform: None,
            layers: LayerRegistry::new(),
        })
    }

    pub fn with_hash(mut self, hash: bool) -> Self {
        self.hash = hash;
        self
    }

    /// Installs a transform that replaces the configured utilities.
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str, &Value) -> TransformResult + Send + Sync + 'static,
    {
        self.transform = Some(std::sync::Arc::new(transform));
        self
    }

    /// Runs the transform hook for one leaf.
    pub fn transform(&self, prop: &str, value: &Value) -> TransformResult {
        match &self.transform {
            Some(transform) => transform(prop, value),
            None => self.utility.transform(prop, value),
        }
    }

    /// Validates `css` and appends it to the named layer.
    pub fn append_css(&mut self, layer: &str, css: &str) -> Result<(), AtomixError> {
        let layer: LayerName = layer.parse()?;
        let root = atomix_css::parser::parse_stylesheet(css)?;
        self.layers.get_mut(layer).append_raw(root.to_string());
        Ok(())
    }

    /// Serializes every layer.
    pub fn insert_layers(&self) -> String {
        self.layers.to_css()
    }
}
