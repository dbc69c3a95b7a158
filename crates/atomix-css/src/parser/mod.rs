//! CSS parsing and fragment validation.
//!
//! - [`parse_stylesheet`]: parses raw CSS text into a [`CssRoot`]
//! - [`validate_selector`], [`validate_value`], [`validate_property`]: check
//!   a single fragment before it is placed into a tree
//!
//! ## Submodules
//!
//! - [`selectors`]: selector grammar (compound, complex, lists)
//! - [`values`]: identifiers, escapes and balanced component values
//!
//! ## Example
//!
//! ```rust
//! use atomix_css::parser::parse_stylesheet;
//! use atomix_css::CssNode;
//!
//! let root = parse_stylesheet(".a { color: red; &:hover { color: blue } }").unwrap();
//! let CssNode::Rule(rule) = &root.nodes[0] else { panic!("expected a rule") };
//! assert_eq!(rule.selector, ".a");
//! assert_eq!(rule.nodes.len(), 2);
//! ```

pub mod selectors;
pub mod values;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, opt, peek, recognize},
    multi::{many0, many0_count},
    sequence::{delimited, preceded, terminated, tuple},
};

use crate::ast::{AtRule, CssNode, CssRoot, Declaration, Rule};
use crate::error::CssSyntaxError;
use crate::parser::selectors::parse_selector_list;
use crate::parser::values::{parse_ident, parse_value};

/// Parses a full stylesheet fragment.
pub fn parse_stylesheet(source: &str) -> Result<CssRoot, CssSyntaxError> {
    let (remaining, nodes) = terminated(parse_nodes, skip_trivia)(source)
        .map_err(|e| syntax_error(source, e, "Unknown word"))?;

    if !remaining.is_empty() {
        let offset = source.len() - remaining.len();
        let reason = if remaining.starts_with('}') {
            "Unexpected }"
        } else if remaining.contains('{') && !remaining.contains('}') {
            "Unclosed block"
        } else {
            "Unknown word"
        };
        return Err(CssSyntaxError::new(reason, source, offset));
    }

    Ok(CssRoot::new(nodes))
}

/// Checks that `selector` is a complete, valid selector list.
pub fn validate_selector(selector: &str) -> Result<(), CssSyntaxError> {
    all_consuming(parse_selector_list)(selector.trim())
        .map(|_| ())
        .map_err(|e| syntax_error(selector.trim(), e, "Invalid selector"))
}

/// Checks that `value` is a complete declaration value or at-rule prelude.
pub fn validate_value(value: &str) -> Result<(), CssSyntaxError> {
    all_consuming(parse_value)(value)
        .map(|_| ())
        .map_err(|e| syntax_error(value, e, "Unknown word"))
}

/// Checks that `prop` is a valid property name.
pub fn validate_property(prop: &str) -> Result<(), CssSyntaxError> {
    all_consuming(parse_ident)(prop)
        .map(|_| ())
        .map_err(|e| syntax_error(prop, e, "Invalid property name"))
}

fn syntax_error(source: &str, err: nom::Err<nom::error::Error<&str>>, reason: &str) -> CssSyntaxError {
    let offset = match &err {
        nom::Err::Error(e) | nom::Err::Failure(e) => source.len().saturating_sub(e.input.len()),
        nom::Err::Incomplete(_) => source.len(),
    };
    CssSyntaxError::new(reason, source, offset)
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize(tuple((tag("/*"), take_until("*/"), tag("*/"))))(input)
}

fn skip_trivia(input: &str) -> IResult<&str, usize> {
    many0_count(alt((multispace1, comment)))(input)
}

fn parse_nodes(input: &str) -> IResult<&str, Vec<CssNode>> {
    many0(preceded(
        skip_trivia,
        alt((
            map(parse_at_rule, CssNode::AtRule),
            map(parse_declaration, CssNode::Decl),
            map(parse_rule, CssNode::Rule),
        )),
    ))(input)
}

fn parse_block(input: &str) -> IResult<&str, Vec<CssNode>> {
    delimited(
        char('{'),
        parse_nodes,
        preceded(tuple((skip_trivia, opt(char(';')), skip_trivia)), char('}')),
    )(input)
}

fn parse_at_rule(input: &str) -> IResult<&str, AtRule> {
    let (input, name) = preceded(char('@'), parse_ident)(input)?;
    let (input, params) = opt(parse_value)(input)?;
    let (input, nodes) = alt((map(char(';'), |_| None), map(parse_block, Some)))(input)?;
    Ok((input, AtRule::new(name, params.unwrap_or("").trim(), nodes)))
}

fn parse_rule(input: &str) -> IResult<&str, Rule> {
    let (input, selector) = recognize(parse_selector_list)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, nodes) = parse_block(input)?;
    Ok((input, Rule::new(selector.trim(), nodes)))
}

/// `prop: value` terminated by `;` or followed by the closing `}`.
fn parse_declaration(input: &str) -> IResult<&str, Declaration> {
    let (input, prop) = parse_ident(input)?;
    let (input, _) = tuple((multispace0, char(':'), multispace0))(input)?;
    let (input, raw) = parse_value(input)?;
    let (input, _) = alt((
        recognize(char(';')),
        recognize(peek(preceded(skip_trivia, char('}')))),
    ))(input)?;

    let (value, important) = split_important(raw);
    Ok((input, Declaration::new(prop, value).important(important)))
}

/// Strips a trailing `!important` (or the short `!`) from a value.
pub fn split_important(raw: &str) -> (&str, bool) {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.ends_with("!important") {
        (trimmed[..trimmed.len() - "!important".len()].trim_end(), true)
    } else if let Some(stripped) = trimmed.strip_suffix('!') {
        (stripped.trim_end(), true)
    } else {
        (trimmed, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rules_and_at_rules() {
        let root = parse_stylesheet(
            "/* utilities */\n@media (min-width: 768px) { .md\\:p_4 { padding: 4px } }\n.a{color:red !important;}",
        )
        .unwrap();
        assert_eq!(root.nodes.len(), 2);

        let CssNode::AtRule(at) = &root.nodes[0] else {
            panic!("expected at-rule");
        };
        assert_eq!(at.name, "media");
        assert_eq!(at.params, "(min-width: 768px)");

        let CssNode::Rule(rule) = &root.nodes[1] else {
            panic!("expected rule");
        };
        assert_eq!(
            rule.nodes,
            vec![CssNode::Decl(Declaration::new("color", "red").important(true))]
        );
    }

    #[test]
    fn parses_statement_at_rule() {
        let root = parse_stylesheet("@layer reset, base;").unwrap();
        assert_eq!(root.nodes, vec![CssNode::AtRule(AtRule::new("layer", "reset, base", None))]);
    }

    #[test]
    fn rejects_stray_closing_brace() {
        let err = parse_stylesheet(".a { color: red; }}").unwrap_err();
        assert_eq!(err.reason, "Unexpected }");
        assert_eq!(err.column, 19);
    }

    #[test]
    fn rejects_unclosed_block() {
        let err = parse_stylesheet(".a { color: red;").unwrap_err();
        assert_eq!(err.reason, "Unclosed block");
    }

    #[test]
    fn validates_fragments() {
        assert!(validate_selector(".color_red").is_ok());
        assert!(validate_selector(".a {").is_err());
        assert!(validate_value("1px solid var(--x)").is_ok());
        assert!(validate_value("red; }").is_err());
        assert!(validate_property("background-color").is_ok());
        assert!(validate_property("back ground").is_err());
    }

    #[test]
    fn splits_important_suffix() {
        assert_eq!(split_important("red !important"), ("red", true));
        assert_eq!(split_important("red!"), ("red", true));
        assert_eq!(split_important("red"), ("red", false));
    }
}
