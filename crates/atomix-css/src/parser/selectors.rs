use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{opt, recognize},
    multi::{many0, many0_count, many1_count},
    sequence::{delimited, pair, preceded, tuple},
};

use crate::parser::values::{parse_ident, parse_value};

/// Parses a simple selector: type, `.class`, `#id`, `:pseudo(...)`, `&`, `*` or `[attr]`.
pub fn parse_simple_selector(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(preceded(char('#'), parse_ident)),
        recognize(preceded(char('.'), parse_ident)),
        recognize(tuple((
            alt((tag("::"), tag(":"))),
            parse_ident,
            opt(delimited(char('('), opt(parse_value), char(')'))),
        ))),
        recognize(char('&')),
        recognize(char('*')),
        recognize(delimited(
            char('['),
            take_while1(|c: char| c != ']' && c != '{' && c != '}'),
            char(']'),
        )),
        parse_ident,
    ))(input)
}

/// Parses a compound selector (e.g. `.btn:hover`).
pub fn parse_compound_selector(input: &str) -> IResult<&str, &str> {
    recognize(many1_count(parse_simple_selector))(input)
}

fn parse_combinator(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(tuple((multispace0, alt((char('>'), char('+'), char('~'))), multispace0))),
        multispace1,
    ))(input)
}

/// Parses a complex selector with combinators (e.g. `.dark .a > b`).
///
/// A leading combinator is accepted for nested relative selectors (`> p`).
pub fn parse_complex_selector(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(pair(alt((char('>'), char('+'), char('~'))), multispace0)),
        parse_compound_selector,
        many0_count(pair(parse_combinator, parse_compound_selector)),
    )))(input)
}

/// Parses a comma-separated selector list, returning each complex selector.
pub fn parse_selector_list(input: &str) -> IResult<&str, Vec<&str>> {
    let (input, first) = parse_complex_selector(input)?;
    let (input, rest) = many0(preceded(
        tuple((multispace0, char(','), multispace0)),
        parse_complex_selector,
    ))(input)?;

    let mut selectors = vec![first];
    selectors.extend(rest);
    Ok((input, selectors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_escaped_class_with_pseudo() {
        let (rest, list) = parse_selector_list(".hover\\:color_blue:hover {").unwrap();
        assert_eq!(list, vec![".hover\\:color_blue:hover"]);
        assert_eq!(rest, " {");
    }

    #[test]
    fn parses_combinators_and_lists() {
        let (rest, list) = parse_selector_list(".dark .a > b, [dir=rtl] &::before").unwrap();
        assert_eq!(rest, "");
        assert_eq!(list, vec![".dark .a > b", "[dir=rtl] &::before"]);
    }

    #[test]
    fn parses_functional_pseudo_classes() {
        let (rest, _) = parse_selector_list("&:nth-child(2n+1):not(.a, .b)").unwrap();
        assert_eq!(rest, "");
    }

    #[test]
    fn stops_at_invalid_characters() {
        let (rest, _) = parse_selector_list(".a}").unwrap();
        assert_eq!(rest, "}");
    }
}
