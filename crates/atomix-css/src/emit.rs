//! Style object to CSS emission.
//!
//! [`to_css`] turns a css-in-js style object into a [`CssRoot`]:
//!
//! ```rust
//! use atomix_css::{to_css, EmitFlags};
//! use serde_json::json;
//!
//! let styles = json!({ ".color_red": { "color": "red", "zIndex": 2, "marginTop": 4 } });
//! let root = to_css(styles.as_object().unwrap(), EmitFlags::empty()).unwrap();
//! assert_eq!(
//!     root.to_string(),
//!     ".color_red {\n  color: red;\n  z-index: 2;\n  margin-top: 4px;\n}"
//! );
//! ```
//!
//! ## Mapping
//!
//! - Scalar values become declarations; camelCase keys are hyphenated
//! - Object values under `@...` keys become at-rules, any other key is a selector
//! - Arrays emit one declaration per entry (fallback values)
//! - `null`, `false`, `true` and empty strings are dropped
//! - Numbers get `px` unless the property is unitless or the value is `0`

use bitflags::bitflags;
use phf::phf_set;
use serde_json::{Map, Value};

use crate::ast::{AtRule, CssNode, CssRoot, Declaration, Rule};
use crate::error::CssSyntaxError;
use crate::parser::{split_important, validate_property, validate_selector, validate_value};

/// An insertion-ordered style object.
pub type StyleMap = Map<String, Value>;

bitflags! {
    /// Options for [`to_css`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EmitFlags: u8 {
        /// Mark every emitted declaration `!important`.
        const IMPORTANT = 0b0000_0001;
    }
}

static UNITLESS: phf::Set<&'static str> = phf_set! {
    "animation-iteration-count",
    "aspect-ratio",
    "box-flex",
    "box-flex-group",
    "column-count",
    "fill-opacity",
    "flex",
    "flex-grow",
    "flex-negative",
    "flex-positive",
    "flex-shrink",
    "font-weight",
    "line-clamp",
    "line-height",
    "opacity",
    "order",
    "orphans",
    "stop-opacity",
    "stroke-dashoffset",
    "stroke-opacity",
    "stroke-width",
    "tab-size",
    "widows",
    "z-index",
    "zoom",
};

/// Converts a camelCase style key to its CSS property name.
///
/// Custom properties and already hyphenated names are returned unchanged.
pub fn hyphenate_property(key: &str) -> String {
    if key.starts_with("--") {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    if out.starts_with("ms-") {
        out.insert(0, '-');
    }
    out
}

/// Returns true for properties whose numeric values take no unit.
pub fn is_unitless(prop: &str) -> bool {
    UNITLESS.contains(prop)
}

/// Serializes a style object into a CSS tree, validating every fragment.
pub fn to_css(styles: &StyleMap, flags: EmitFlags) -> Result<CssRoot, CssSyntaxError> {
    let mut nodes = Vec::new();
    emit_object(styles, flags, &mut nodes)?;
    Ok(CssRoot::new(nodes))
}

fn emit_object(styles: &StyleMap, flags: EmitFlags, out: &mut Vec<CssNode>) -> Result<(), CssSyntaxError> {
    for (key, value) in styles {
        match value {
            Value::Object(nested) => {
                let mut nodes = Vec::new();
                emit_object(nested, flags, &mut nodes)?;
                if key.starts_with('@') {
                    let at = AtRule::from_prelude(key, Some(nodes));
                    validate_property(&at.name)?;
                    if !at.params.is_empty() {
                        validate_value(&at.params)?;
                    }
                    out.push(CssNode::AtRule(at));
                } else {
                    validate_selector(key)?;
                    out.push(CssNode::Rule(Rule::new(key.trim(), nodes)));
                }
            }
            Value::Array(items) => {
                for item in items {
                    emit_declaration(key, item, flags, out)?;
                }
            }
            _ => emit_declaration(key, value, flags, out)?,
        }
    }
    Ok(())
}

fn emit_declaration(
    key: &str,
    value: &Value,
    flags: EmitFlags,
    out: &mut Vec<CssNode>,
) -> Result<(), CssSyntaxError> {
    let prop = hyphenate_property(key.trim());
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.as_f64() == Some(0.0) => "0".to_string(),
        Value::Number(n) if is_unitless(&prop) || prop.starts_with("--") => n.to_string(),
        Value::Number(n) => format!("{n}px"),
        _ => return Ok(()),
    };

    let (value, important) = split_important(&raw);
    if value.is_empty() {
        return Ok(());
    }

    validate_property(&prop)?;
    validate_value(value)?;
    out.push(CssNode::Decl(
        Declaration::new(prop, value).important(important || flags.contains(EmitFlags::IMPORTANT)),
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn emit(value: Value, flags: EmitFlags) -> Result<CssRoot, CssSyntaxError> {
        to_css(value.as_object().expect("object"), flags)
    }

    #[test]
    fn hyphenates_keys() {
        assert_eq!(hyphenate_property("backgroundColor"), "background-color");
        assert_eq!(hyphenate_property("msTransition"), "-ms-transition");
        assert_eq!(hyphenate_property("WebkitAppearance"), "-webkit-appearance");
        assert_eq!(hyphenate_property("--brandColor"), "--brandColor");
    }

    #[test]
    fn emits_top_level_declarations() {
        let root = emit(json!({ "color": "red", "opacity": 0.5 }), EmitFlags::empty()).unwrap();
        assert_eq!(root.to_string(), "color: red;\nopacity: 0.5;");
    }

    #[test]
    fn important_flag_marks_every_declaration() {
        let root = emit(json!({ "color": "red" }), EmitFlags::IMPORTANT).unwrap();
        assert_eq!(root.to_string(), "color: red !important;");
    }

    #[test]
    fn important_suffix_is_not_duplicated() {
        let root = emit(json!({ "color": "red !important" }), EmitFlags::IMPORTANT).unwrap();
        assert_eq!(root.to_string(), "color: red !important;");
    }

    #[test]
    fn drops_empty_values() {
        let root = emit(
            json!({ "color": null, "display": false, "margin": "" }),
            EmitFlags::empty(),
        )
        .unwrap();
        assert!(root.is_empty());
    }

    #[test]
    fn arrays_emit_fallbacks() {
        let root = emit(json!({ "display": ["flex", "grid"] }), EmitFlags::empty()).unwrap();
        assert_eq!(root.to_string(), "display: flex;\ndisplay: grid;");
    }

    #[test]
    fn at_rules_wrap_nested_rules() {
        let root = emit(
            json!({ "@media (min-width: 768px)": { ".md\\:p_4": { "padding": 4 } } }),
            EmitFlags::empty(),
        )
        .unwrap();
        assert_eq!(
            root.to_string(),
            "@media (min-width: 768px) {\n  .md\\:p_4 {\n    padding: 4px;\n  }\n}"
        );
    }

    #[test]
    fn rejects_broken_selector() {
        let err = emit(json!({ ".a {": { "color": "red" } }), EmitFlags::empty()).unwrap_err();
        assert_eq!(err.reason, "Invalid selector");
        assert_eq!(err.input, ".a {");
    }

    #[test]
    fn rejects_value_that_closes_a_block() {
        let err = emit(json!({ ".a": { "color": "red; } .b {" } }), EmitFlags::empty()).unwrap_err();
        assert_eq!(err.reason, "Unknown word");
        assert_eq!(err.column, 4);
    }
}
