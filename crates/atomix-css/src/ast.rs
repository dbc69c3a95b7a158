//! CSS node tree produced by the emitter and the stylesheet parser.
//!
//! The tree is intentionally small: rules, at-rules and declarations. It
//! renders back to text through [`Display`](std::fmt::Display) with two-space
//! indentation and one declaration per line.

use std::fmt;

/// A declaration such as `color: red !important`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub prop: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    pub fn new(prop: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            prop: prop.into(),
            value: value.into(),
            important: false,
        }
    }

    pub fn important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }
}

/// A qualified rule: a selector followed by a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub nodes: Vec<CssNode>,
}

impl Rule {
    pub fn new(selector: impl Into<String>, nodes: Vec<CssNode>) -> Self {
        Self {
            selector: selector.into(),
            nodes,
        }
    }
}

/// An at-rule. `nodes` is `None` for statement at-rules like `@layer a, b;`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtRule {
    pub name: String,
    pub params: String,
    pub nodes: Option<Vec<CssNode>>,
}

impl AtRule {
    pub fn new(name: impl Into<String>, params: impl Into<String>, nodes: Option<Vec<CssNode>>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            nodes,
        }
    }

    /// Splits a prelude like `@media (min-width: 40em)` into name and params.
    pub fn from_prelude(prelude: &str, nodes: Option<Vec<CssNode>>) -> Self {
        let prelude = prelude.trim();
        let prelude = prelude.strip_prefix('@').unwrap_or(prelude);
        match prelude.find(|c: char| c.is_whitespace() || c == '(') {
            Some(idx) => Self::new(&prelude[..idx], prelude[idx..].trim(), nodes),
            None => Self::new(prelude, "", nodes),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CssNode {
    Rule(Rule),
    AtRule(AtRule),
    Decl(Declaration),
}

impl CssNode {
    /// True when the node would render no declarations at all.
    pub fn is_empty(&self) -> bool {
        match self {
            CssNode::Decl(_) => false,
            CssNode::Rule(rule) => rule.nodes.iter().all(CssNode::is_empty),
            CssNode::AtRule(at) => match &at.nodes {
                Some(nodes) => nodes.iter().all(CssNode::is_empty),
                None => false,
            },
        }
    }
}

/// The root of a CSS tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CssRoot {
    pub nodes: Vec<CssNode>,
}

impl CssRoot {
    pub fn new(nodes: Vec<CssNode>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(CssNode::is_empty)
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.prop, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        f.write_str(";")
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, nodes: &[CssNode], depth: usize) -> fmt::Result {
    f.write_str(" {\n")?;
    for node in nodes {
        write_node(f, node, depth + 1)?;
        f.write_str("\n")?;
    }
    write!(f, "{:indent$}}}", "", indent = depth * 2)
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &CssNode, depth: usize) -> fmt::Result {
    write!(f, "{:indent$}", "", indent = depth * 2)?;
    match node {
        CssNode::Decl(decl) => write!(f, "{decl}"),
        CssNode::Rule(rule) => {
            f.write_str(&rule.selector)?;
            write_block(f, &rule.nodes, depth)
        }
        CssNode::AtRule(at) => {
            write!(f, "@{}", at.name)?;
            if !at.params.is_empty() {
                write!(f, " {}", at.params)?;
            }
            match &at.nodes {
                Some(nodes) => write_block(f, nodes, depth),
                None => f.write_str(";"),
            }
        }
    }
}

impl fmt::Display for CssNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self, 0)
    }
}

impl fmt::Display for CssRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, node) in self.nodes.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            write_node(f, node, 0)?;
        }
        Ok(())
    }
}
