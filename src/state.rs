//! Sans-IO session logic for a Twitch chat connection.
//!
//! Nothing in this module touches a socket. [`handshake`] produces the
//! registration lines to send, and [`SessionMachine`] turns each parsed
//! incoming line into at most one [`SessionAction`]. The connection manager
//! performs the actual I/O.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use twitched_irc::chat::BadgeTable;
//! use twitched_irc::state::{SessionAction, SessionMachine};
//! use twitched_irc::Message;
//!
//! let mut machine = SessionMachine::new(Arc::new(Arc::new(BadgeTable::new())));
//!
//! let ping = Message::parse("PING :tmi.twitch.tv").unwrap();
//! match machine.feed(&ping) {
//!     Some(SessionAction::Send(reply)) => assert_eq!(reply.to_string(), "PONG tmi.twitch.tv"),
//!     _ => unreachable!(),
//! }
//! ```

use std::sync::Arc;

use crate::chat::{self, BadgeSource, ChatMessage};
use crate::command::Command;
use crate::config::ClientConfig;
use crate::event::Event;
use crate::Message;

/// Body of the synthetic message emitted when the server confirms a JOIN.
pub const CONNECTED_TEXT: &str = "connected";

/// Body of the synthetic message emitted when the server reports a PART.
pub const DISCONNECTED_TEXT: &str = "disconnected";

/// Lifecycle of a connection manager.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectionState {
    /// No socket.
    #[default]
    Disconnected,
    /// Resolving, dialing, or sending the handshake.
    Connecting,
    /// Handshake sent and read loop running.
    Joined,
}

/// Account credentials from the external credential provider.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Credentials {
    /// OAuth access token, with or without the `oauth:` scheme.
    pub access_token: String,
    /// Account login used as the nickname.
    pub account_login: String,
}

impl Credentials {
    /// Bundle a token and login.
    pub fn new(access_token: impl Into<String>, account_login: impl Into<String>) -> Credentials {
        Credentials {
            access_token: access_token.into(),
            account_login: account_login.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("account_login", &self.account_login)
            .finish()
    }
}

/// Anonymous nickname: `prefix` followed by `suffix` clamped to `0..=2^31-1`.
pub fn guest_nickname(prefix: &str, suffix: u32) -> String {
    format!("{}{}", prefix, suffix & 0x7fff_ffff)
}

/// Registration lines, in send order: `CAP REQ`, then `PASS`/`NICK` (or a
/// guest `NICK`), then `JOIN`.
pub fn handshake(
    config: &ClientConfig,
    channel: &str,
    credentials: Option<&Credentials>,
    guest_suffix: u32,
) -> Vec<Message> {
    let mut lines = Vec::with_capacity(4);

    if !config.capabilities.is_empty() {
        lines.push(Message::cap_req(&config.capabilities));
    }

    match credentials {
        Some(credentials) => {
            lines.push(Message::pass(&credentials.access_token));
            lines.push(Message::nick(&credentials.account_login.to_lowercase()));
        }
        None => lines.push(Message::nick(&guest_nickname(
            &config.guest_prefix,
            guest_suffix,
        ))),
    }

    lines.push(Message::join(channel));
    lines
}

/// What the connection manager should do with one incoming line.
#[derive(Debug)]
pub enum SessionAction {
    /// Write this message back to the server right away.
    ///
    /// Boxed to keep the enum small.
    Send(Box<Message>),
    /// Hand this event to the consumer.
    Emit(Event),
}

/// Per-connection dispatch state.
pub struct SessionMachine {
    badges: Arc<dyn BadgeSource>,
    channel: Option<String>,
}

impl SessionMachine {
    /// Create a machine that resolves badges through `badges`.
    pub fn new(badges: Arc<dyn BadgeSource>) -> SessionMachine {
        SessionMachine {
            badges,
            channel: None,
        }
    }

    /// Channel recorded from the server's JOIN, if one arrived.
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Dispatch one parsed line.
    pub fn feed(&mut self, message: &Message) -> Option<SessionAction> {
        match &message.command {
            Command::PING => {
                let reply = match message.param(0) {
                    Some(token) => Message::pong(token),
                    None => Message::new(Command::PONG, Vec::<String>::new()),
                };
                Some(SessionAction::Send(Box::new(reply)))
            }
            Command::PRIVMSG => {
                let badges = self.badges.snapshot();
                Some(SessionAction::Emit(Event::Message(chat::build(
                    message, &badges,
                ))))
            }
            Command::JOIN => {
                let channel = message.param(0).unwrap_or_default().to_owned();
                tracing::info!(%channel, "joined channel");
                self.channel = Some(channel.clone());
                Some(SessionAction::Emit(Event::ConnectionNotice(
                    ChatMessage::system(channel, CONNECTED_TEXT),
                )))
            }
            Command::PART => {
                let channel = message
                    .param(0)
                    .map(str::to_owned)
                    .or_else(|| self.channel.clone())
                    .unwrap_or_default();
                tracing::info!(%channel, "parted channel");
                Some(SessionAction::Emit(Event::ConnectionNotice(
                    ChatMessage::system(channel, DISCONNECTED_TEXT),
                )))
            }
            Command::NOTICE => {
                let text = message.params.join(" ");
                tracing::info!(notice = %text, "server notice");
                Some(SessionAction::Emit(Event::Notice(text)))
            }
            Command::Response(response) => {
                tracing::trace!(%response, "ignoring numeric reply");
                None
            }
            command => {
                tracing::trace!(%command, "ignoring command");
                None
            }
        }
    }
}
