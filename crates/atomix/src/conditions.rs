//! Condition registry: pseudo states, breakpoints and custom conditions.
//!
//! A condition is a key inside a style object that scopes the values below
//! it. [`Conditions`] knows every registered condition, moves property keys
//! in front of condition keys ([`Conditions::shift`]) and reduces a
//! condition path to its canonical, priority ordered form
//! ([`Conditions::finalize`]).
//!
//! ## Condition kinds
//!
//! | Raw value               | Kind                  | Applied as                  |
//! |-------------------------|-----------------------|-----------------------------|
//! | `&:hover`               | self nesting          | `.cls:hover`                |
//! | `& > p`                 | combinator nesting    | `.cls > p`                  |
//! | `.dark &`               | parent nesting        | `.dark .cls`                |
//! | `@media (min-width: …)` | at-rule               | wraps the rule              |

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use phf::phf_map;

use crate::error::AtomixError;

/// The no-op condition; values under it apply unconditionally.
pub const BASE_CONDITION: &str = "base";

static PSEUDO_CONDITIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "_hover" => "&:hover",
    "_focus" => "&:focus",
    "_focusWithin" => "&:focus-within",
    "_focusVisible" => "&:focus-visible",
    "_active" => "&:active",
    "_visited" => "&:visited",
    "_disabled" => "&:disabled",
    "_checked" => "&:checked",
    "_first" => "&:first-child",
    "_last" => "&:last-child",
    "_odd" => "&:nth-child(odd)",
    "_even" => "&:nth-child(even)",
    "_before" => "&::before",
    "_after" => "&::after",
    "_placeholder" => "&::placeholder",
    "_selection" => "&::selection",
    "_groupHover" => ".group:hover &",
    "_peerFocus" => ".peer:focus ~ &",
    "_dark" => ".dark &",
    "_light" => ".light &",
    "_rtl" => "[dir=rtl] &",
    "_ltr" => "[dir=ltr] &",
    "_motionReduce" => "@media (prefers-reduced-motion: reduce)",
    "_print" => "@media print",
};

/// Breakpoints used when the configuration defines none.
pub const DEFAULT_BREAKPOINTS: [(&str, &str); 5] = [
    ("sm", "640px"),
    ("md", "768px"),
    ("lg", "1024px"),
    ("xl", "1280px"),
    ("2xl", "1536px"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    /// `&:hover`, `&::before`
    SelfNesting,
    /// `& > p`, `& + &`
    CombinatorNesting,
    /// `.dark &`
    ParentNesting,
    /// `@media ...`, `@container ...`
    AtRule,
}

impl ConditionKind {
    fn rank(self) -> u8 {
        match self {
            Self::SelfNesting => 0,
            Self::ParentNesting => 1,
            Self::CombinatorNesting => 2,
            Self::AtRule => 3,
        }
    }

    /// Classifies a raw condition value, or `None` if it cannot scope a rule.
    pub fn classify(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.starts_with('@') {
            Some(Self::AtRule)
        } else if let Some(rest) = raw.strip_prefix('&') {
            if rest.starts_with(char::is_whitespace) {
                Some(Self::CombinatorNesting)
            } else {
                Some(Self::SelfNesting)
            }
        } else if raw.contains('&') {
            Some(Self::ParentNesting)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionDetails {
    pub kind: ConditionKind,
    pub raw: String,
    /// Lower sorts first. Selector conditions are 0, at-rules 1,
    /// breakpoints 2 + their position.
    pub priority: u32,
}

impl ConditionDetails {
    fn from_raw(raw: &str) -> Option<Self> {
        let kind = ConditionKind::classify(raw)?;
        let priority = if kind == ConditionKind::AtRule { 1 } else { 0 };
        Some(Self {
            kind,
            raw: raw.trim().to_string(),
            priority,
        })
    }
}

/// The condition registry.
#[derive(Clone, Debug)]
pub struct Conditions {
    values: BTreeMap<String, ConditionDetails>,
    breakpoints: Vec<String>,
}

impl Default for Conditions {
    fn default() -> Self {
        let breakpoints = DEFAULT_BREAKPOINTS
            .iter()
            .map(|(name, width)| (name.to_string(), width.to_string()))
            .collect();
        // The built-in tables are well formed.
        Self::new(breakpoints, BTreeMap::new()).unwrap_or_else(|_| Self {
            values: BTreeMap::new(),
            breakpoints: Vec::new(),
        })
    }
}

impl Conditions {
    /// Builds a registry from breakpoints (name -> min-width) and custom
    /// conditions (name -> raw selector or at-rule).
    pub fn new(
        breakpoints: BTreeMap<String, String>,
        custom: BTreeMap<String, String>,
    ) -> Result<Self, AtomixError> {
        let mut values = BTreeMap::new();

        for (name, raw) in PSEUDO_CONDITIONS.entries() {
            if let Some(details) = ConditionDetails::from_raw(raw) {
                values.insert(name.to_string(), details);
            }
        }

        for (name, raw) in custom {
            let details = ConditionDetails::from_raw(&raw)
                .ok_or_else(|| AtomixError::InvalidCondition { name: name.clone(), raw: raw.clone() })?;
            values.insert(name, details);
        }

        let mut sorted = Vec::with_capacity(breakpoints.len());
        for (name, value) in breakpoints {
            let width = leading_number(&value).ok_or_else(|| AtomixError::InvalidBreakpoint {
                name: name.clone(),
                value: value.clone(),
            })?;
            sorted.push((width, name, value));
        }
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let mut names = Vec::with_capacity(sorted.len());
        for (idx, (_, name, value)) in sorted.into_iter().enumerate() {
            values.insert(
                name.clone(),
                ConditionDetails {
                    kind: ConditionKind::AtRule,
                    raw: format!("@media screen and (min-width: {value})"),
                    priority: 2 + idx as u32,
                },
            );
            names.push(name);
        }

        Ok(Self {
            values,
            breakpoints: names,
        })
    }

    /// Breakpoint names, smallest first.
    pub fn breakpoints(&self) -> &[String] {
        &self.breakpoints
    }

    /// True for registered condition names.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// True for registered names, raw nesting selectors, at-rules and `base`.
    pub fn is_condition(&self, key: &str) -> bool {
        let key = key.trim();
        key == BASE_CONDITION || self.has(key) || ConditionKind::classify(key).is_some()
    }

    /// Details for a registered name or a raw condition.
    pub fn details(&self, key: &str) -> Option<ConditionDetails> {
        let key = key.trim();
        self.values
            .get(key)
            .cloned()
            .or_else(|| ConditionDetails::from_raw(key))
    }

    /// Trims every key and moves non-condition keys (the property or a
    /// condition-group marker) in front of the conditions. Otherwise stable.
    pub fn shift(&self, paths: &[String]) -> Vec<String> {
        let mut keys: Vec<String> = paths.iter().map(|p| p.trim().to_string()).collect();
        keys.sort_by_key(|key| self.is_condition(key));
        keys
    }

    /// Resolves a condition path to canonical tokens and their details,
    /// deduplicated and in canonical order.
    ///
    /// Keys that are neither `base` nor a condition are skipped. Ordering is
    /// by priority; equal priorities order by kind, then by token, so the
    /// same set of conditions always yields the same order. When the path
    /// holds a combinator, selector conditions keep their path order since
    /// reordering them would change what the selector matches.
    pub fn resolve(&self, paths: &[String]) -> Vec<(String, ConditionDetails)> {
        let mut resolved: Vec<(String, ConditionDetails)> = Vec::with_capacity(paths.len());
        let mut seen = HashSet::new();

        for path in paths.iter().map(|p| p.trim()) {
            if path == BASE_CONDITION {
                continue;
            }
            let entry = match self.values.get(path) {
                Some(details) => (
                    path.strip_prefix('_').unwrap_or(path).to_string(),
                    details.clone(),
                ),
                None => match ConditionDetails::from_raw(path) {
                    Some(details) => (format!("[{}]", without_space(path)), details),
                    None => continue,
                },
            };
            if seen.insert(entry.0.clone()) {
                resolved.push(entry);
            }
        }

        let keep_selector_order = resolved
            .iter()
            .any(|(_, details)| details.kind == ConditionKind::CombinatorNesting);

        resolved.sort_by(|(a_token, a), (b_token, b)| {
            a.priority.cmp(&b.priority).then_with(|| {
                if keep_selector_order && a.kind != ConditionKind::AtRule {
                    Ordering::Equal
                } else {
                    a.kind
                        .rank()
                        .cmp(&b.kind.rank())
                        .then_with(|| a_token.cmp(b_token))
                }
            })
        });
        resolved
    }

    /// Reduces a condition path to its canonical form.
    ///
    /// `base` is dropped, registered names lose their leading `_`, raw
    /// selectors and at-rules become `[...]` with whitespace removed and
    /// duplicates are removed. See [`resolve`](Self::resolve) for ordering.
    pub fn finalize(&self, paths: &[String]) -> Vec<String> {
        self.resolve(paths).into_iter().map(|(token, _)| token).collect()
    }

    /// Resolves a condition path to the details applied to a compiled rule,
    /// in the same order [`finalize`](Self::finalize) produces.
    pub fn sorted_details(&self, paths: &[String]) -> Vec<ConditionDetails> {
        self.resolve(paths).into_iter().map(|(_, details)| details).collect()
    }
}

/// Removes all whitespace.
pub fn without_space(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Drops the `base` condition from a path.
pub fn filter_base_conditions(conditions: Vec<String>) -> Vec<String> {
    conditions
        .into_iter()
        .filter(|c| c.trim() != BASE_CONDITION)
        .collect()
}

fn leading_number(value: &str) -> Option<f64> {
    let end = value
        .trim()
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.trim().len());
    value.trim()[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn classifies_raw_conditions() {
        assert_eq!(ConditionKind::classify("&:hover"), Some(ConditionKind::SelfNesting));
        assert_eq!(ConditionKind::classify("& > p"), Some(ConditionKind::CombinatorNesting));
        assert_eq!(ConditionKind::classify(".dark &"), Some(ConditionKind::ParentNesting));
        assert_eq!(ConditionKind::classify("@media print"), Some(ConditionKind::AtRule));
        assert_eq!(ConditionKind::classify("color"), None);
    }

    #[test]
    fn shift_moves_property_first() {
        let conditions = Conditions::default();
        assert_eq!(
            conditions.shift(&paths(&["md", " color ", "_hover"])),
            paths(&["color", "md", "_hover"])
        );
    }

    #[test]
    fn finalize_orders_by_priority() {
        let conditions = Conditions::default();
        assert_eq!(
            conditions.finalize(&paths(&["lg", "_hover", "sm", "base", "_hover"])),
            paths(&["hover", "sm", "lg"])
        );
    }

    #[test]
    fn finalize_wraps_raw_conditions() {
        let conditions = Conditions::default();
        assert_eq!(
            conditions.finalize(&paths(&["@media (min-width: 10px)", "& > p"])),
            paths(&["[&>p]", "[@media(min-width:10px)]"])
        );
    }

    #[test]
    fn finalize_is_deterministic() {
        let conditions = Conditions::default();
        let input = paths(&["_dark", "md", "_focus"]);
        assert_eq!(conditions.finalize(&input), conditions.finalize(&input));
    }

    #[test]
    fn selector_conditions_order_by_kind_then_token() {
        let conditions = Conditions::default();
        let expected = paths(&["focus", "hover", "dark"]);
        assert_eq!(conditions.finalize(&paths(&["_dark", "_hover", "_focus"])), expected);
        assert_eq!(conditions.finalize(&paths(&["_hover", "_focus", "_dark"])), expected);
    }

    #[test]
    fn at_rules_with_equal_priority_order_by_token() {
        let conditions = Conditions::default();
        assert_eq!(
            conditions.finalize(&paths(&["_print", "_motionReduce"])),
            conditions.finalize(&paths(&["_motionReduce", "_print"]))
        );
    }

    #[test]
    fn combinators_keep_selector_path_order() {
        let conditions = Conditions::default();
        assert_eq!(
            conditions.finalize(&paths(&["& > p", "_hover"])),
            paths(&["[&>p]", "hover"])
        );
        assert_eq!(
            conditions.finalize(&paths(&["_hover", "& > p"])),
            paths(&["hover", "[&>p]"])
        );
    }

    #[test]
    fn unknown_keys_are_not_conditions() {
        let conditions = Conditions::default();
        assert_eq!(conditions.finalize(&paths(&["hoverr", "md"])), paths(&["md"]));
        assert_eq!(conditions.sorted_details(&paths(&["hoverr"])), vec![]);
    }

    #[test]
    fn breakpoints_sort_by_width() {
        let mut breakpoints = BTreeMap::new();
        breakpoints.insert("tablet".to_string(), "48em".to_string());
        breakpoints.insert("desktop".to_string(), "64em".to_string());
        breakpoints.insert("phone".to_string(), "20em".to_string());
        let conditions = Conditions::new(breakpoints, BTreeMap::new()).unwrap();
        assert_eq!(conditions.breakpoints(), &paths(&["phone", "tablet", "desktop"])[..]);
    }

    #[test]
    fn rejects_invalid_custom_condition() {
        let mut custom = BTreeMap::new();
        custom.insert("_weird".to_string(), "hover".to_string());
        let err = Conditions::new(BTreeMap::new(), custom).unwrap_err();
        assert!(matches!(err, AtomixError::InvalidCondition { .. }));
    }

    #[test]
    fn rejects_breakpoint_without_width() {
        let mut breakpoints = BTreeMap::new();
        breakpoints.insert("md".to_string(), "wide".to_string());
        let err = Conditions::new(breakpoints, BTreeMap::new()).unwrap_err();
        assert!(matches!(err, AtomixError::InvalidBreakpoint { .. }));
    }
}
