//! Identifiers and component values.
//!
//! Values are validated structurally rather than by property: brackets and
//! parentheses must balance, strings must close, and `;`, `{` and `}` may
//! only appear inside a group or a string.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while_m_n, take_while1},
    character::complete::{char, satisfy},
    combinator::{opt, recognize},
    multi::{many0_count, many1_count},
    sequence::{delimited, pair, preceded, terminated, tuple},
};

/// An escape sequence: `\:` or a hex escape such as `\31 `.
pub fn parse_escape(input: &str) -> IResult<&str, &str> {
    recognize(preceded(
        char('\\'),
        alt((
            recognize(terminated(
                take_while_m_n(1, 6, |c: char| c.is_ascii_hexdigit()),
                opt(char(' ')),
            )),
            recognize(satisfy(|c| c != '\n' && c != '\r')),
        )),
    ))(input)
}

fn name_start(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(satisfy(|c: char| c.is_ascii_alphabetic() || c == '_' || !c.is_ascii())),
        parse_escape,
    ))(input)
}

fn name_char(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(satisfy(|c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
        })),
        parse_escape,
    ))(input)
}

/// Parses a CSS identifier, including custom properties (`--brand`) and
/// escaped class names (`hover\:color_red`).
pub fn parse_ident(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(pair(tag("--"), many1_count(name_char))),
        recognize(tuple((opt(char('-')), name_start, many0_count(name_char)))),
    ))(input)
}

fn quoted<'a>(quote: char) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input| {
        recognize(delimited(
            char(quote),
            many0_count(alt((
                parse_escape,
                recognize(satisfy(move |c| c != quote && c != '\\' && c != '\n')),
            ))),
            char(quote),
        ))(input)
    }
}

/// Contents of a `( ... )` or `[ ... ]` group; `;` is allowed here (`url(data:...;base64)`).
fn group_body(input: &str) -> IResult<&str, &str> {
    recognize(many1_count(alt((value_atom, recognize(char(';'))))))(input)
}

fn value_atom(input: &str) -> IResult<&str, &str> {
    alt((
        quoted('"'),
        quoted('\''),
        recognize(delimited(char('('), opt(group_body), char(')'))),
        recognize(delimited(char('['), opt(group_body), char(']'))),
        parse_escape,
        take_while1(|c: char| {
            !matches!(c, ';' | '{' | '}' | '(' | ')' | '[' | ']' | '"' | '\'' | '\\')
        }),
    ))(input)
}

/// Recognizes a component value up to (not including) `;`, `{` or `}`.
pub fn parse_value(input: &str) -> IResult<&str, &str> {
    recognize(many1_count(value_atom))(input)
}
