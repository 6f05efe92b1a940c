//! The owned IRC message type and its outgoing constructors.

use crate::chan::ChannelExt;
use crate::command::Command;
use crate::prefix::Prefix;

use super::tags::Tags;

/// A parsed (or to-be-sent) IRC line.
///
/// Incoming lines are produced by [`Message::parse`]; outgoing ones by the
/// constructors below and written with [`IrcEncode`](crate::encode::IrcEncode).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Vendor tags, empty when the line carried none.
    pub tags: Tags,
    /// Message source, absent for lines without a `:` prefix.
    pub prefix: Option<Prefix>,
    /// The command.
    pub command: Command,
    /// Parameters; a trailing parameter is stored without its `:`.
    pub params: Vec<String>,
}

impl Message {
    /// Create a message with no tags and no prefix.
    pub fn new<I, S>(command: Command, params: I) -> Message
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Message {
            tags: Tags::new(),
            prefix: None,
            command,
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// `CAP REQ :<cap> <cap>...`
    pub fn cap_req<S: AsRef<str>>(caps: &[S]) -> Message {
        let caps: Vec<&str> = caps.iter().map(AsRef::as_ref).collect();
        Message::new(Command::CAP, ["REQ".to_owned(), caps.join(" ")])
    }

    /// `PASS oauth:<token>`; the `oauth:` scheme is added when missing.
    pub fn pass(token: &str) -> Message {
        let token = if token.starts_with("oauth:") {
            token.to_owned()
        } else {
            format!("oauth:{}", token)
        };
        Message::new(Command::PASS, [token])
    }

    /// `NICK <nickname>`
    pub fn nick(nickname: &str) -> Message {
        Message::new(Command::NICK, [nickname])
    }

    /// `JOIN #<channel>`, normalizing the channel name.
    pub fn join(channel: &str) -> Message {
        Message::new(Command::JOIN, [channel.to_channel_name()])
    }

    /// `PART #<channel>`, normalizing the channel name.
    pub fn part(channel: &str) -> Message {
        Message::new(Command::PART, [channel.to_channel_name()])
    }

    /// `PONG <token>`
    pub fn pong(token: &str) -> Message {
        Message::new(Command::PONG, [token])
    }

    /// `PRIVMSG #<channel> :<text>`
    pub fn privmsg(channel: &str, text: &str) -> Message {
        Message::new(
            Command::PRIVMSG,
            [channel.to_channel_name(), text.to_owned()],
        )
    }

    /// Add a tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Message {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Set the prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Prefix) -> Message {
        self.prefix = Some(prefix);
        self
    }

    /// Nickname or server name of the source, `""` when there is no prefix.
    pub fn source_name(&self) -> &str {
        self.prefix.as_ref().map_or("", |p| p.name.as_str())
    }

    /// Username of the source, `""` when absent.
    pub fn user(&self) -> &str {
        self.prefix
            .as_ref()
            .and_then(|p| p.user.as_deref())
            .unwrap_or("")
    }

    /// Hostname of the source, `""` when absent.
    pub fn host(&self) -> &str {
        self.prefix
            .as_ref()
            .and_then(|p| p.host.as_deref())
            .unwrap_or("")
    }

    /// Tag value for `key`, if the tag is present.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Parameter at `index`.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}
