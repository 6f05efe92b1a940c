//! IRC command types.
//!
//! The client only understands the closed set of commands a Twitch chat
//! session exchanges. Every other token, including unrecognized numerics,
//! becomes [`Command::Unknown`]; that is never a parse failure.

use std::borrow::Cow;
use std::fmt;

use crate::response::Response;

/// IRC command name.
///
/// Parameters are carried separately on [`Message`](crate::Message).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum Command {
    /// `PASS oauth:<token>`
    PASS,
    /// `NICK <login>`
    NICK,
    /// `JOIN #<channel>`
    JOIN,
    /// `PING <token>`
    PING,
    /// `PONG <token>`
    PONG,
    /// `PRIVMSG #<channel> :<text>`
    PRIVMSG,
    /// `PART #<channel>`
    PART,
    /// `NOTICE <target> :<text>`
    NOTICE,
    /// `CAP <subcommand> ...`
    CAP,
    /// A recognized numeric reply.
    Response(Response),
    /// Any token outside the set above, kept verbatim.
    Unknown(String),
}

impl Command {
    /// Map a command token to a [`Command`].
    ///
    /// Matching is ASCII case-insensitive for textual commands.
    pub fn from_token(token: &str) -> Command {
        if token.len() == 3 && token.bytes().all(|b| b.is_ascii_digit()) {
            return match token.parse::<Response>() {
                Ok(response) => Command::Response(response),
                Err(_) => Command::Unknown(token.to_owned()),
            };
        }

        match token.to_ascii_uppercase().as_str() {
            "PASS" => Command::PASS,
            "NICK" => Command::NICK,
            "JOIN" => Command::JOIN,
            "PING" => Command::PING,
            "PONG" => Command::PONG,
            "PRIVMSG" => Command::PRIVMSG,
            "PART" => Command::PART,
            "NOTICE" => Command::NOTICE,
            "CAP" => Command::CAP,
            _ => Command::Unknown(token.to_owned()),
        }
    }

    /// The wire name of this command.
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Command::PASS => Cow::Borrowed("PASS"),
            Command::NICK => Cow::Borrowed("NICK"),
            Command::JOIN => Cow::Borrowed("JOIN"),
            Command::PING => Cow::Borrowed("PING"),
            Command::PONG => Cow::Borrowed("PONG"),
            Command::PRIVMSG => Cow::Borrowed("PRIVMSG"),
            Command::PART => Cow::Borrowed("PART"),
            Command::NOTICE => Cow::Borrowed("NOTICE"),
            Command::CAP => Cow::Borrowed("CAP"),
            Command::Response(response) => Cow::Owned(response.to_string()),
            Command::Unknown(token) => Cow::Borrowed(token),
        }
    }

    /// Returns `true` for the catch-all variant.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Command::Unknown(_))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
