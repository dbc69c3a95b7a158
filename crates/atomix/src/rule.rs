//! The atomic rule compiler.
//!
//! [`AtomicRule`] compiles one style object at a time into the layers of a
//! [`StylesheetContext`]. It has two entry points:
//!
//! - [`AtomicRule::process`]: bulk path. The (optionally normalized) object is
//!   serialized as is and appended to the destination layer as one fragment.
//! - [`AtomicRule::process_atomic`]: per-leaf path. Every leaf becomes its own
//!   class rule named by [`AtomicRule::hash_fn`], with its conditions applied
//!   to the selector or wrapped around it as at-rules.
//!
//! ## Example
//!
//! ```rust
//! use atomix::{AtomicRule, ProcessOptions, StylesheetContext};
//! use serde_json::json;
//!
//! let mut context = StylesheetContext::default();
//! let mut rule = AtomicRule::new(&mut context, None);
//! rule.process_atomic(ProcessOptions::new(json!({ "color": { "base": "red", "_hover": "blue" } })));
//!
//! let css = rule.to_css();
//! assert!(css.contains(".color_red {\n    color: red;\n  }"));
//! assert!(css.contains(".hover\\:color_blue:hover {\n    color: blue;\n  }"));
//! ```
//!
//! ## Failure policy
//!
//! Neither entry point returns an error. Input that is not an object is
//! ignored, and a style object whose CSS is rejected is logged under the
//! `sheet` target and dropped without touching any layer.

use atomix_css::parser::{validate_property, validate_selector, validate_value};
use atomix_css::{AtRule, CssNode, CssSyntaxError, EmitFlags, Rule, StyleMap, to_css};
use serde_json::Value;

use crate::conditions::{ConditionDetails, ConditionKind, filter_base_conditions};
use crate::context::StylesheetContext;
use crate::hash;
use crate::layers::LayerName;
use crate::normalize::{is_important, normalize_style_object, walk_object, without_important};

/// Input for one compilation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessOptions {
    pub styles: Value,
    /// Run [`normalize_style_object`] first.
    pub normalize: bool,
    /// Destination layer; overrides the layer the compiler was built with.
    pub layer: Option<String>,
}

impl ProcessOptions {
    pub fn new(styles: Value) -> Self {
        Self {
            styles,
            ..Default::default()
        }
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }
}

#[derive(Debug)]
struct CompiledRule {
    selector: String,
    node: CssNode,
    layer: Option<String>,
}

pub struct AtomicRule<'a> {
    context: &'a mut StylesheetContext,
    layer: LayerName,
}

impl<'a> AtomicRule<'a> {
    /// Binds a compiler to `context`. Unknown layer names fall back to
    /// `utilities`.
    pub fn new(context: &'a mut StylesheetContext, layer: Option<&str>) -> Self {
        let resolved = LayerName::lookup(layer).unwrap_or_default();
        if let Some(name) = layer.filter(|name| name.trim() != resolved.as_str()) {
            log::debug!(target: "sheet", "unknown layer `{name}`, using `{resolved}`");
        }
        Self {
            context,
            layer: resolved,
        }
    }

    pub fn layer(&self) -> LayerName {
        self.layer
    }

    pub fn context(&self) -> &StylesheetContext {
        &*self.context
    }

    /// Composes the escaped class name for `class_name` under `conditions`.
    pub fn hash_fn(&self, conditions: &[String], class_name: &str) -> String {
        hash::hash_fn(
            &self.context.conditions,
            &self.context.utility,
            self.context.hash,
            conditions,
            class_name,
        )
    }

    fn prepare(&self, options: ProcessOptions) -> Option<(StyleMap, LayerName)> {
        let ProcessOptions {
            styles,
            normalize,
            layer,
        } = options;

        let Value::Object(styles) = styles else {
            return None;
        };

        let layer = LayerName::lookup(layer.as_deref()).unwrap_or(self.layer);
        let styles = if normalize {
            normalize_style_object(&styles, self.context())
        } else {
            styles
        };
        Some((styles, layer))
    }

    /// Serializes the style object and appends it to the destination layer.
    pub fn process(&mut self, options: ProcessOptions) {
        let Some((styles, layer)) = self.prepare(options) else {
            return;
        };

        match to_css(&styles, EmitFlags::empty()) {
            Ok(root) => self.context.layers.get_mut(layer).append_raw(root.to_string()),
            Err(error) => report_syntax_error(&error),
        }
    }

    /// Compiles every leaf into its own deduplicated class rule.
    pub fn process_atomic(&mut self, options: ProcessOptions) {
        let Some((styles, layer)) = self.prepare(options) else {
            return;
        };

        let rules = match self.compile_leaves(&styles) {
            Ok(rules) => rules,
            Err(error) => {
                report_syntax_error(&error);
                return;
            }
        };

        let mut root = Vec::new();
        for rule in rules {
            match rule.layer.as_deref() {
                Some(name) => {
                    let target = name.parse::<LayerName>().unwrap_or_else(|err| {
                        log::debug!(target: "sheet", "{err}, using `{}`", LayerName::default());
                        LayerName::default()
                    });
                    self.context.layers.get_mut(target).append_rule(rule.selector, rule.node);
                }
                None => root.push(rule),
            }
        }

        if root.is_empty() {
            return;
        }

        let target = self.context.layers.get_mut(layer);
        for rule in root {
            if !target.append_rule(rule.selector, rule.node) {
                log::trace!(target: "sheet", "duplicate rule skipped");
            }
        }
    }

    fn compile_leaves(&self, styles: &StyleMap) -> Result<Vec<CompiledRule>, CssSyntaxError> {
        let mut leaves = Vec::new();
        walk_object(styles, &mut |value, paths| {
            if !value.is_null() {
                leaves.push((value.clone(), paths.to_vec()));
            }
        });

        let mut rules = Vec::with_capacity(leaves.len());
        for (value, paths) in leaves {
            if let Some(rule) = self.compile_leaf(&value, &paths)? {
                rules.push(rule);
            }
        }
        Ok(rules)
    }

    fn compile_leaf(&self, value: &Value, paths: &[String]) -> Result<Option<CompiledRule>, CssSyntaxError> {
        let conditions = &self.context.conditions;
        let important = is_important(value);

        // condition groups can appear anywhere in the path
        let mut keys = conditions.shift(paths);
        if keys.is_empty() {
            return Ok(None);
        }
        let prop = keys.remove(0);
        let leaf_conditions: Vec<String> = filter_base_conditions(keys)
            .into_iter()
            .filter(|key| {
                let known = conditions.is_condition(key);
                if !known {
                    log::debug!(target: "sheet", "`{key}` under `{prop}` is not a condition, ignored");
                }
                known
            })
            .collect();

        let transformed = self.context.transform(&prop, &without_important(value));
        let flags = if important {
            EmitFlags::IMPORTANT
        } else {
            EmitFlags::empty()
        };

        let attribute = |err: CssSyntaxError| match &transformed.plugin {
            Some(plugin) => err.with_plugin(plugin.clone()),
            None => err,
        };
        let root = to_css(&transformed.styles, flags).map_err(attribute)?;

        // no empty rulesets
        if root.is_empty() {
            return Ok(None);
        }

        let name = self.hash_fn(&leaf_conditions, &transformed.class_name);
        let selector = if important {
            format!(".{name}\\!")
        } else {
            format!(".{name}")
        };

        let details = conditions.sorted_details(&leaf_conditions);
        let node = apply_conditions(&selector, root.nodes, &details).map_err(attribute)?;

        Ok(Some(CompiledRule {
            selector,
            node,
            layer: transformed.layer,
        }))
    }

    /// Serializes all layers of the context.
    pub fn to_css(&self) -> String {
        self.context.insert_layers()
    }
}

/// Builds the rule for `selector`, nesting selector conditions into it and
/// wrapping it in at-rule conditions, first condition outermost.
///
/// Fails if the rewritten selector or an at-rule prelude is not valid CSS.
fn apply_conditions(
    selector: &str,
    nodes: Vec<CssNode>,
    conditions: &[ConditionDetails],
) -> Result<CssNode, CssSyntaxError> {
    let mut selector = selector.to_string();
    let mut at_rules = Vec::new();

    for condition in conditions {
        match condition.kind {
            ConditionKind::AtRule => at_rules.push(condition.raw.as_str()),
            ConditionKind::SelfNesting
            | ConditionKind::CombinatorNesting
            | ConditionKind::ParentNesting => selector = condition.raw.replace('&', &selector),
        }
    }

    validate_selector(&selector)?;
    let mut node = CssNode::Rule(Rule::new(selector, nodes));
    for prelude in at_rules.into_iter().rev() {
        let at = AtRule::from_prelude(prelude, Some(vec![node]));
        validate_property(&at.name)?;
        if !at.params.is_empty() {
            validate_value(&at.params)?;
        }
        node = CssNode::AtRule(at);
    }
    Ok(node)
}

fn report_syntax_error(error: &CssSyntaxError) {
    log::error!(target: "sheet", "{}", error);
    log::error!(target: "sheet", "{}", error.show_source_code());
    if let Some(plugin) = &error.plugin {
        log::error!(target: "sheet", "By plugin: {plugin}:");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn details(raw: &str) -> ConditionDetails {
        ConditionDetails {
            kind: ConditionKind::classify(raw).expect("condition"),
            raw: raw.to_string(),
            priority: 0,
        }
    }

    #[test]
    fn conditions_nest_into_selector() {
        let node = apply_conditions(".x", vec![], &[details("&:hover"), details(".dark &")]).unwrap();
        let CssNode::Rule(rule) = node else {
            panic!("expected rule");
        };
        assert_eq!(rule.selector, ".dark .x:hover");
    }

    #[test]
    fn at_rules_wrap_first_outermost() {
        let node = apply_conditions(
            ".x",
            vec![],
            &[details("@media print"), details("@supports (display: grid)")],
        )
        .unwrap();
        let CssNode::AtRule(outer) = node else {
            panic!("expected at-rule");
        };
        assert_eq!(outer.name, "media");
        let inner = outer.nodes.as_ref().and_then(|nodes| nodes.first());
        assert!(matches!(inner, Some(CssNode::AtRule(at)) if at.name == "supports"));
    }

    #[test]
    fn malformed_conditions_are_rejected() {
        let err = apply_conditions(".x", vec![], &[details("&:hover } .evil {")]).unwrap_err();
        assert_eq!(err.reason, "Invalid selector");

        let err = apply_conditions(".x", vec![], &[details("@media (min-width: 10px")]).unwrap_err();
        assert_eq!(err.reason, "Unknown word");
    }

    #[test]
    fn padded_layer_name_resolves() {
        let mut context = StylesheetContext::default();
        let rule = AtomicRule::new(&mut context, Some(" recipes "));
        assert_eq!(rule.layer(), LayerName::Recipes);
    }

    #[test]
    fn unknown_bound_layer_falls_back_to_utilities() {
        let mut context = StylesheetContext::default();
        let rule = AtomicRule::new(&mut context, Some("components"));
        assert_eq!(rule.layer(), LayerName::Utilities);
    }

    #[test]
    fn explicit_layer_option_wins() {
        let mut context = StylesheetContext::default();
        let mut rule = AtomicRule::new(&mut context, Some("base"));
        rule.process(ProcessOptions::new(json!({ "html": { "color": "black" } })).layer("reset"));
        rule.process(ProcessOptions::new(json!({ "body": { "margin": 0 } })).layer("nope"));

        assert_eq!(context.layers.get(LayerName::Reset).len(), 1);
        assert_eq!(context.layers.get(LayerName::Base).len(), 1);
    }

    #[test]
    fn non_object_input_is_ignored() {
        let mut context = StylesheetContext::default();
        let mut rule = AtomicRule::new(&mut context, None);
        rule.process(ProcessOptions::new(json!("color: red")));
        rule.process_atomic(ProcessOptions::new(json!(["color", "red"])));
        rule.process_atomic(ProcessOptions::new(Value::Null));
        assert!(context.layers.get(LayerName::Utilities).is_empty());
    }

    #[test]
    fn hash_fn_readable_and_hashed() {
        let mut context = StylesheetContext::default();
        let conditions = vec!["md".to_string(), "_hover".to_string()];

        let readable = AtomicRule::new(&mut context, None).hash_fn(&conditions, "color_red");
        assert_eq!(readable, "hover\\:md\\:color_red");

        context.hash = true;
        let hashed = AtomicRule::new(&mut context, None).hash_fn(&conditions, "color_red");
        assert_eq!(hashed, hash::to_hash("hover:md:color_red"));
    }
}
