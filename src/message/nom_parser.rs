//! Nom-based splitter for IRC lines.
//!
//! Breaks a line into prefix, command, middle parameters and trailing
//! segment. It does not validate nicks, channels or command names.

use nom::{
    bytes::complete::{take_till, take_till1, take_while},
    character::complete::char,
    combinator::{opt, rest, verify},
    error::{context, VerboseError},
    multi::many0,
    sequence::{pair, preceded},
    IResult,
};

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

fn is_space(c: char) -> bool {
    c.is_whitespace()
}

/// Skip separators. Any whitespace counts, matching what ends a token.
fn separator(input: &str) -> ParseResult<&str, &str> {
    take_while(is_space)(input)
}

/// Parse message prefix (the token after a leading `:`).
///
/// The token may be empty, as in `": PING"`.
fn parse_prefix(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing message prefix",
        preceded(char(':'), take_till(is_space)),
    )(input)
}

/// Parse one whitespace-delimited token that does not open the trailing segment.
fn parse_middle(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing middle parameter",
        preceded(
            separator,
            verify(take_till1(is_space), |s: &str| !s.starts_with(':')),
        ),
    )(input)
}

/// Parse the trailing segment: everything after the colon that opens a parameter.
fn parse_trailing(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing trailing parameter",
        preceded(pair(separator, char(':')), rest),
    )(input)
}

/// Split a terminator-free line into its components.
///
/// ```text
/// [:prefix] <command> [params...] [:trailing]
/// ```
pub(crate) fn parse_line(input: &str) -> ParseResult<&str, SplitLine<'_>> {
    let (input, prefix) = context("parsing optional prefix", opt(parse_prefix))(input)?;
    let (input, command) = context("parsing command", opt(parse_middle))(input)?;
    let (input, params) = context("parsing parameters", many0(parse_middle))(input)?;
    let (input, trailing) = opt(parse_trailing)(input)?;

    Ok((
        input,
        SplitLine {
            prefix,
            command,
            params,
            trailing,
        },
    ))
}

/// A line split into borrowed components.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SplitLine<'a> {
    /// Prefix without the leading `:`, if present.
    pub prefix: Option<&'a str>,
    /// The command token, absent for an empty line.
    pub command: Option<&'a str>,
    /// Positional parameters after the command.
    pub params: Vec<&'a str>,
    /// Trailing segment without its `:`, if present.
    pub trailing: Option<&'a str>,
}

impl<'a> SplitLine<'a> {
    /// Split `input`, falling back to plain whitespace tokenizing if the
    /// combinators reject it or leave anything but whitespace unconsumed.
    pub fn split(input: &'a str) -> Self {
        match parse_line(input) {
            Ok((remaining, line)) if remaining.trim_start().is_empty() => line,
            _ => {
                let mut tokens = input.split_whitespace();
                SplitLine {
                    command: tokens.next(),
                    params: tokens.collect(),
                    ..Default::default()
                }
            }
        }
    }
}
