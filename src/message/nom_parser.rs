//! Nom-based IRC message parser.
//!
//! This module splits a line into borrowed slices of its grammar parts.
//! Interpretation of those parts (tag decoding, prefix splitting, command
//! lookup) happens in [`Message::parse`](super::Message::parse).

use crate::error::MessageParseError;

use nom::{
    bytes::complete::{take_until, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    error::{context, VerboseError, VerboseErrorKind},
    sequence::preceded,
    IResult,
};

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

/// Parse the vendor tag block (the part after `@` and before the first space).
fn parse_tags(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing message tags",
        preceded(char('@'), take_until(" ")),
    )(input)
}

/// Parse message prefix (the part after `:` and before the first space).
fn parse_prefix(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing message prefix",
        preceded(char(':'), take_while1(|c| c != ' ')),
    )(input)
}

/// Parse the command name (ASCII letters and digits).
fn parse_command(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing IRC command",
        take_while1(|c: char| c.is_ascii_alphanumeric()),
    )(input)
}

/// Parse a complete IRC line into its components.
///
/// ```text
/// [@tags ][:prefix ]<command>[ params...][ :trailing][\r][\n]
/// ```
pub fn parse_message(input: &str) -> ParseResult<&str, RawMessage<'_>> {
    let (input, tags) = context("parsing optional tags", opt(parse_tags))(input)?;
    let (input, _) = space0(input)?;

    let (input, prefix) = context("parsing optional prefix", opt(parse_prefix))(input)?;
    let (input, _) = space0(input)?;

    let (input, command) = context("parsing required command", parse_command)(input)?;

    let mut params: Vec<&str> = Vec::new();
    let mut rest = input;

    while let Some(b' ') = rest.as_bytes().first().copied() {
        rest = &rest[1..];

        if let Some(b':') = rest.as_bytes().first().copied() {
            // Trailing parameter - everything after `:` until line end
            let after_colon = &rest[1..];
            let end = after_colon
                .find(['\r', '\n'])
                .unwrap_or(after_colon.len());
            params.push(&after_colon[..end]);
            rest = &after_colon[end..];
            break;
        }

        let end = rest.find([' ', '\r', '\n']).unwrap_or(rest.len());
        let param = &rest[..end];
        if param.is_empty() {
            break;
        }
        params.push(param);
        rest = &rest[end..];
    }

    Ok((
        rest,
        RawMessage {
            tags,
            prefix,
            command,
            params,
        },
    ))
}

/// A line split into borrowed grammar parts.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage<'a> {
    /// Raw tag block (without the leading `@`), if present.
    pub tags: Option<&'a str>,
    /// Raw prefix (without the leading `:`), if present.
    pub prefix: Option<&'a str>,
    /// The command token.
    pub command: &'a str,
    /// Parameters, the trailing one last and without its `:`.
    pub params: Vec<&'a str>,
}

impl<'a> RawMessage<'a> {
    /// Split a line into its grammar parts.
    ///
    /// On failure the error carries the byte offset and the innermost nom
    /// context that was being parsed.
    pub fn parse(input: &'a str) -> Result<Self, MessageParseError> {
        match parse_message(input) {
            Ok((_remaining, msg)) => Ok(msg),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                let mut what = "parsing message";
                let mut position = input.len();

                for (error_input, error_kind) in &e.errors {
                    position = input.len() - error_input.len();
                    if let VerboseErrorKind::Context(ctx) = error_kind {
                        what = *ctx;
                        break;
                    }
                }

                Err(MessageParseError::Syntax {
                    position,
                    context: what,
                })
            }
            Err(nom::Err::Incomplete(_)) => Err(MessageParseError::Syntax {
                position: input.len(),
                context: "incomplete input",
            }),
        }
    }
}
