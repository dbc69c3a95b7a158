//! Style object helpers: walking, normalization and `!important` handling.

use atomix_css::StyleMap;
use atomix_css::parser::split_important;
use serde_json::Value;

use crate::conditions::BASE_CONDITION;
use crate::context::StylesheetContext;

/// Calls `f` for every non-object leaf with the key path leading to it,
/// in insertion order.
pub fn walk_object<F>(styles: &StyleMap, f: &mut F)
where
    F: FnMut(&Value, &[String]),
{
    let mut path = Vec::new();
    walk_inner(styles, &mut path, f);
}

fn walk_inner<F>(styles: &StyleMap, path: &mut Vec<String>, f: &mut F)
where
    F: FnMut(&Value, &[String]),
{
    for (key, value) in styles {
        path.push(key.clone());
        match value {
            Value::Object(nested) => walk_inner(nested, path, f),
            leaf => f(leaf, path.as_slice()),
        }
        path.pop();
    }
}

/// Expands responsive arrays into breakpoint objects and resolves utility
/// shorthands on property keys.
///
/// `["red", null, "blue"]` with breakpoints `sm, md` becomes
/// `{ "base": "red", "md": "blue" }`.
pub fn normalize_style_object(styles: &StyleMap, context: &StylesheetContext) -> StyleMap {
    let mut out = StyleMap::new();
    for (key, value) in styles {
        let key = if context.conditions.is_condition(key) {
            key.clone()
        } else {
            context.utility.resolve_shorthand(key).to_string()
        };

        let value = match value {
            Value::Object(nested) => Value::Object(normalize_style_object(nested, context)),
            Value::Array(items) => Value::Object(to_responsive_object(items, context)),
            other => other.clone(),
        };
        out.insert(key, value);
    }
    out
}

fn to_responsive_object(items: &[Value], context: &StylesheetContext) -> StyleMap {
    let keys = std::iter::once(BASE_CONDITION).chain(context.conditions.breakpoints().iter().map(String::as_str));
    keys.zip(items)
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// True for string values ending in `!important` or `!`.
pub fn is_important(value: &Value) -> bool {
    match value {
        Value::String(s) => split_important(s).1,
        _ => false,
    }
}

/// The value with any `!important` marker removed.
pub fn without_important(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(split_important(s).0.to_string()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> StyleMap {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn walks_leaves_in_order() {
        let styles = object(json!({ "color": { "base": "red", "_hover": "blue" }, "margin": 4 }));
        let mut seen = Vec::new();
        walk_object(&styles, &mut |value, path| seen.push((path.join("."), value.clone())));
        assert_eq!(
            seen,
            vec![
                ("color.base".to_string(), json!("red")),
                ("color._hover".to_string(), json!("blue")),
                ("margin".to_string(), json!(4)),
            ]
        );
    }

    #[test]
    fn expands_responsive_arrays() {
        let context = StylesheetContext::default();
        let styles = object(json!({ "padding": [1, null, 3], "_hover": { "color": ["red", "blue"] } }));
        assert_eq!(
            normalize_style_object(&styles, &context),
            object(json!({
                "padding": { "base": 1, "md": 3 },
                "_hover": { "color": { "base": "red", "sm": "blue" } }
            }))
        );
    }

    #[test]
    fn detects_important_markers() {
        assert!(is_important(&json!("red !important")));
        assert!(is_important(&json!("red!")));
        assert!(!is_important(&json!("red")));
        assert!(!is_important(&json!(4)));
        assert_eq!(without_important(&json!("red !important")), json!("red"));
    }
}
