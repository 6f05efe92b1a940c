//! # twitched-irc
//!
//! A Twitch chat client built on the IRC protocol.
//!
//! ## Features
//!
//! - IRC line parsing with IRCv3 tags, prefixes, commands, and parameters
//! - Twitch tag decoding: display name, color, badges, emotes
//! - Chat message construction ready for rendering
//! - Optional Tokio integration: line codec, TCP transport, and a
//!   connection manager with a read loop and automatic PING replies
//!
//! ## Quick Start
//!
//! ### Parsing chat lines
//!
//! ```rust
//! use twitched_irc::{chat, BadgeTable, Message, Rgb};
//!
//! let raw = "@color=#1E90FF;display-name=Tester;emotes=25:0-4 \
//!            :tester!tester@tester.tmi.twitch.tv PRIVMSG #chan :Kappa hi";
//! let message = Message::parse(raw).unwrap();
//!
//! let chat = chat::build(&message, &BadgeTable::new());
//! assert_eq!(chat.display_name, "Tester");
//! assert_eq!(chat.body, "Kappa hi");
//! assert_eq!(chat.color, Rgb(0x1E, 0x90, 0xFF));
//! assert_eq!(chat.emotes[0].end, 4);
//! ```
//!
//! ### Building commands
//!
//! ```rust
//! use twitched_irc::Message;
//!
//! assert_eq!(Message::join("SomeStreamer").to_string(), "JOIN #somestreamer");
//! assert_eq!(Message::pass("abc").to_string(), "PASS oauth:abc");
//! assert_eq!(Message::privmsg("#chan", "hello there").to_string(), "PRIVMSG #chan :hello there");
//! ```

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod chan;
pub mod chat;
pub mod command;
pub mod config;
pub mod encode;
pub mod error;
pub mod event;
pub mod message;
pub mod prefix;
pub mod response;
pub mod state;

#[cfg(feature = "tokio")]
pub mod client;
#[cfg(feature = "tokio")]
pub mod codec;
#[cfg(feature = "tokio")]
pub mod connection;
#[cfg(feature = "tokio")]
pub mod transport;

pub use self::chan::ChannelExt;
pub use self::chat::{BadgeSource, BadgeTable, ChatMessage, Emote, Rgb};
pub use self::command::Command;
pub use self::config::{ClientConfig, MAX_IRC_LINE_LEN};
pub use self::encode::IrcEncode;
pub use self::error::{ConnectionError, MessageParseError, ProtocolError};
pub use self::event::Event;
pub use self::message::{Message, Tags};
pub use self::prefix::Prefix;
pub use self::response::Response;
pub use self::state::{ConnectionState, Credentials};

#[cfg(feature = "tokio")]
pub use self::client::{Client, Events, TryRecvError};
#[cfg(feature = "tokio")]
pub use self::codec::IrcCodec;
#[cfg(feature = "tokio")]
pub use self::connection::Connection;
#[cfg(feature = "tokio")]
pub use self::transport::Transport;
