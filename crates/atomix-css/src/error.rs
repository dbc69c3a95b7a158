//! Error types for CSS emission and parsing.
//!
//! Every failure in this crate is a [`CssSyntaxError`]: the emitter and the
//! stylesheet parser both report the offending fragment, the position inside
//! it, and optionally the plugin that produced the input.

use std::fmt::Write;

use thiserror::Error;

/// A CSS fragment could not be emitted or parsed.
///
/// # Examples
///
/// ```rust
/// use atomix_css::parser::parse_stylesheet;
///
/// let error = parse_stylesheet(".a { color: red; }}").unwrap_err();
/// assert_eq!(error.line, 1);
/// assert!(error.show_source_code().contains('^'));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("<css input>:{line}:{column}: {reason}")]
pub struct CssSyntaxError {
    /// What was wrong.
    pub reason: String,
    /// The CSS text the error points into.
    pub input: String,
    /// 1-based line inside `input`.
    pub line: usize,
    /// 1-based column inside `input`.
    pub column: usize,
    /// Name of the plugin that produced the failing input, if known.
    pub plugin: Option<String>,
}

impl CssSyntaxError {
    /// Creates an error pointing at byte `offset` of `input`.
    pub fn new(reason: impl Into<String>, input: impl Into<String>, offset: usize) -> Self {
        let input = input.into();
        let offset = offset.min(input.len());
        let before = input.get(..offset).unwrap_or(&input);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|idx| idx + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;

        Self {
            reason: reason.into(),
            input,
            line,
            column,
            plugin: None,
        }
    }

    /// Attributes the error to a plugin.
    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = Some(plugin.into());
        self
    }

    /// Renders the input around the error with a caret under the column.
    ///
    /// ```text
    /// > 1 | .a { color: red; }}
    ///     |                   ^
    /// ```
    pub fn show_source_code(&self) -> String {
        let lines: Vec<&str> = self.input.lines().collect();
        let first = self.line.saturating_sub(2).max(1);
        let last = (self.line + 2).min(lines.len().max(1));
        let width = last.to_string().len();

        let mut out = String::new();
        for number in first..=last {
            let text = lines.get(number - 1).copied().unwrap_or("");
            if number == self.line {
                let _ = writeln!(out, "> {number:>width$} | {text}");
                let pad = " ".repeat(self.column.saturating_sub(1));
                let _ = writeln!(out, "  {:>width$} | {pad}^", "");
            } else {
                let _ = writeln!(out, "  {number:>width$} | {text}");
            }
        }
        out.truncate(out.trim_end().len());
        out
    }
}
