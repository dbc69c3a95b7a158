//! The utility transform hook.
//!
//! [`Utility::transform`] maps a `(property, value)` leaf to the class token
//! and the declarations the atomic rule will carry. Utilities are configured
//! per property with [`UtilityConfig`]; unconfigured properties fall back to
//! `<property>_<value>` with the value written as is.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use atomix_css::{StyleMap, hyphenate_property};
use serde::Deserialize;
use serde_json::Value;

use crate::conditions::without_space;

/// Per-property utility configuration.
///
/// ```rust
/// use atomix::UtilityConfig;
///
/// let config: UtilityConfig = serde_json::from_value(serde_json::json!({
///     "className": "bg",
///     "shorthand": ["bg"],
///     "property": "backgroundColor",
///     "values": { "brand": "#ff0066" }
/// }))
/// .unwrap();
/// assert_eq!(config.class_name.as_deref(), Some("bg"));
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UtilityConfig {
    /// Class token prefix; defaults to the hyphenated property.
    pub class_name: Option<String>,
    /// Alternative keys that resolve to this utility.
    pub shorthand: Vec<String>,
    /// The CSS property written; defaults to the utility key.
    pub property: Option<String>,
    /// Token to CSS value map. An empty CSS value yields no declaration.
    pub values: BTreeMap<String, String>,
    /// Cascade layer the generated rules belong to.
    pub layer: Option<String>,
}

/// Output of a transform.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformResult {
    /// Declarations for the rule (a flat style map).
    pub styles: StyleMap,
    /// The class token, before condition composition and escaping.
    pub class_name: String,
    /// Explicit target layer, if the utility names one.
    pub layer: Option<String>,
    /// Plugin that produced the styles, used to attribute syntax errors.
    pub plugin: Option<String>,
}

/// A user supplied transform that replaces [`Utility::transform`].
pub type TransformFn = Arc<dyn Fn(&str, &Value) -> TransformResult + Send + Sync>;

#[derive(Clone, Debug)]
pub struct Utility {
    prefix: Option<String>,
    separator: String,
    configs: BTreeMap<String, UtilityConfig>,
    shorthands: HashMap<String, String>,
}

impl Default for Utility {
    fn default() -> Self {
        Self::new(None, "_", BTreeMap::new())
    }
}

impl Utility {
    pub fn new(
        prefix: Option<String>,
        separator: impl Into<String>,
        configs: BTreeMap<String, UtilityConfig>,
    ) -> Self {
        let shorthands = configs
            .iter()
            .flat_map(|(prop, config)| {
                config
                    .shorthand
                    .iter()
                    .map(move |short| (short.clone(), prop.clone()))
            })
            .collect();

        Self {
            prefix: prefix.filter(|p| !p.is_empty()),
            separator: separator.into(),
            configs,
            shorthands,
        }
    }

    /// Maps a shorthand key to the utility it stands for.
    pub fn resolve_shorthand<'a>(&'a self, prop: &'a str) -> &'a str {
        self.shorthands.get(prop).map(String::as_str).unwrap_or(prop)
    }

    /// Applies the configured prefix to a class name.
    pub fn format_class_name(&self, class_name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}-{class_name}"),
            None => class_name.to_string(),
        }
    }

    pub fn transform(&self, prop: &str, value: &Value) -> TransformResult {
        let prop = self.resolve_shorthand(prop);
        let config = self.configs.get(prop);

        let token = value_token(value);
        let class_prefix = config
            .and_then(|c| c.class_name.clone())
            .unwrap_or_else(|| hyphenate_property(prop));
        let class_name = format!("{class_prefix}{}{}", self.separator, without_space(&token));

        let property = config
            .and_then(|c| c.property.clone())
            .unwrap_or_else(|| prop.to_string());

        let mut styles = StyleMap::new();
        match config.and_then(|c| c.values.get(&token)) {
            Some(css) if css.is_empty() => {}
            Some(css) => {
                styles.insert(property, Value::String(css.clone()));
            }
            None => {
                styles.insert(property, value.clone());
            }
        }

        TransformResult {
            styles,
            class_name,
            layer: config.and_then(|c| c.layer.clone()),
            plugin: None,
        }
    }
}

/// The string form of a leaf value used in class names and token lookup.
fn value_token(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
