use std::str::FromStr;

use crate::command::Command;
use crate::error::MessageParseError;
use crate::prefix::Prefix;

use super::nom_parser::RawMessage;
use super::tags::{decode_tags, Tags};
use super::Message;

impl Message {
    /// Parse one line, with or without its `\r\n` terminator.
    ///
    /// Parsing is total: any input yields either a message or `None`, the
    /// "no match" result for lines without a command token. Callers discard
    /// `None` silently.
    pub fn parse(line: &str) -> Option<Message> {
        match line.parse::<Message>() {
            Ok(msg) => Some(msg),
            Err(e) => {
                tracing::trace!(line, error = %e, "discarding unparseable line");
                None
            }
        }
    }
}

impl FromStr for Message {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        let trimmed = s.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        let raw = RawMessage::parse(trimmed)?;

        let prefix = match raw.prefix {
            Some(p) => Some(
                Prefix::parse(p).ok_or_else(|| MessageParseError::InvalidPrefix(p.to_owned()))?,
            ),
            None => None,
        };

        Ok(Message {
            tags: raw.tags.map(decode_tags).unwrap_or_else(Tags::new),
            prefix,
            command: Command::from_token(raw.command),
            params: raw.params.into_iter().map(str::to_owned).collect(),
        })
    }
}
