//! Cascade layers.
//!
//! The set of layers is closed and ordered: `reset`, `base`, `tokens`,
//! `recipes`, `utilities`. Each [`Layer`] is an append-only sequence of raw
//! CSS fragments and compiled rules; entry order is output order.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use atomix_css::CssNode;

use crate::error::AtomixError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerName {
    Reset,
    Base,
    Tokens,
    Recipes,
    #[default]
    Utilities,
}

impl LayerName {
    /// All layers in cascade order.
    pub const ALL: [LayerName; 5] = [
        LayerName::Reset,
        LayerName::Base,
        LayerName::Tokens,
        LayerName::Recipes,
        LayerName::Utilities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerName::Reset => "reset",
            LayerName::Base => "base",
            LayerName::Tokens => "tokens",
            LayerName::Recipes => "recipes",
            LayerName::Utilities => "utilities",
        }
    }

    /// Parses an optional layer name leniently; unknown names give `None`.
    pub fn lookup(name: Option<&str>) -> Option<LayerName> {
        name.and_then(|n| n.parse().ok())
    }
}

impl FromStr for LayerName {
    type Err = AtomixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerName::ALL
            .into_iter()
            .find(|layer| layer.as_str() == s.trim())
            .ok_or_else(|| AtomixError::UnknownLayer(s.to_string()))
    }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerEntry {
    /// A pre-rendered CSS fragment.
    Raw(String),
    /// A compiled atomic rule keyed by its class selector.
    Rule { selector: String, node: CssNode },
}

impl fmt::Display for LayerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerEntry::Raw(css) => f.write_str(css),
            LayerEntry::Rule { node, .. } => write!(f, "{node}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Layer {
    name: LayerName,
    entries: Vec<LayerEntry>,
    selectors: HashSet<String>,
}

impl Layer {
    pub fn new(name: LayerName) -> Self {
        Self {
            name,
            entries: Vec::new(),
            selectors: HashSet::new(),
        }
    }

    pub fn name(&self) -> LayerName {
        self.name
    }

    pub fn entries(&self) -> &[LayerEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Appends a rendered fragment. Blank fragments are ignored.
    pub fn append_raw(&mut self, css: impl Into<String>) {
        let css = css.into();
        if !css.trim().is_empty() {
            self.entries.push(LayerEntry::Raw(css));
        }
    }

    /// Appends a compiled rule unless a rule with the same selector is
    /// already present. Returns whether the rule was added.
    pub fn append_rule(&mut self, selector: impl Into<String>, node: CssNode) -> bool {
        let selector = selector.into();
        if !self.selectors.insert(selector.clone()) {
            return false;
        }
        self.entries.push(LayerEntry::Rule { selector, node });
        true
    }

    /// Renders the entries, one per block, without the `@layer` wrapper.
    pub fn body(&self) -> String {
        self.entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One [`Layer`] per [`LayerName`], owned by a single compilation session.
#[derive(Clone, Debug)]
pub struct LayerRegistry {
    layers: Vec<Layer>,
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self {
            layers: LayerName::ALL.into_iter().map(Layer::new).collect(),
        }
    }
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: LayerName) -> &Layer {
        &self.layers[name as usize]
    }

    pub fn get_mut(&mut self, name: LayerName) -> &mut Layer {
        &mut self.layers[name as usize]
    }

    /// Serializes every non-empty layer in cascade order, preceded by the
    /// layer order statement.
    pub fn to_css(&self) -> String {
        let order = LayerName::ALL.map(|name| name.as_str()).join(", ");
        let mut blocks = vec![format!("@layer {order};")];

        for layer in self.layers.iter().filter(|layer| !layer.is_empty()) {
            let body = indent(&layer.body());
            blocks.push(format!("@layer {} {{\n{body}\n}}", layer.name()));
        }

        blocks.join("\n\n")
    }
}

fn indent(css: &str) -> String {
    css.lines()
        .map(|line| if line.is_empty() { String::new() } else { format!("  {line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use atomix_css::{Declaration, Rule};

    fn rule(selector: &str, prop: &str, value: &str) -> CssNode {
        CssNode::Rule(Rule::new(selector, vec![CssNode::Decl(Declaration::new(prop, value))]))
    }

    #[test]
    fn parses_layer_names() {
        assert_eq!("recipes".parse::<LayerName>().unwrap(), LayerName::Recipes);
        assert_eq!(
            "components".parse::<LayerName>().unwrap_err(),
            AtomixError::UnknownLayer("components".to_string())
        );
        assert_eq!(LayerName::lookup(Some("nope")), None);
    }

    #[test]
    fn append_rule_is_set_like() {
        let mut layer = Layer::new(LayerName::Utilities);
        assert!(layer.append_rule(".color_red", rule(".color_red", "color", "red")));
        assert!(!layer.append_rule(".color_red", rule(".color_red", "color", "red")));
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn blank_raw_fragments_are_ignored() {
        let mut layer = Layer::new(LayerName::Base);
        layer.append_raw("  \n");
        assert!(layer.is_empty());
    }

    #[test]
    fn registry_renders_non_empty_layers_in_order() {
        let mut registry = LayerRegistry::new();
        registry
            .get_mut(LayerName::Utilities)
            .append_rule(".color_red", rule(".color_red", "color", "red"));
        registry.get_mut(LayerName::Reset).append_raw("* {\n  margin: 0;\n}");

        assert_eq!(
            registry.to_css(),
            "@layer reset, base, tokens, recipes, utilities;\n\n\
             @layer reset {\n  * {\n    margin: 0;\n  }\n}\n\n\
             @layer utilities {\n  .color_red {\n    color: red;\n  }\n}"
        );
    }

    #[test]
    fn empty_registry_only_declares_order() {
        assert_eq!(
            LayerRegistry::new().to_css(),
            "@layer reset, base, tokens, recipes, utilities;"
        );
    }
}
