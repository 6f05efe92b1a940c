//! Events delivered to the consumer of a [`Client`](crate::Client).

use crate::chat::ChatMessage;
use crate::error::ConnectionError;

/// One item of the consumer-facing event stream, in socket order.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Event {
    /// A chat line from a user.
    Message(ChatMessage),
    /// Synthetic "connected"/"disconnected" line for the joined channel.
    ConnectionNotice(ChatMessage),
    /// Server `NOTICE` text. Diagnostic only; not meant for the chat view.
    Notice(String),
    /// A transient network fault; the connection is now disconnected.
    Error(ConnectionError),
}

impl Event {
    /// The chat message carried by this event, if any.
    pub fn chat_message(&self) -> Option<&ChatMessage> {
        match self {
            Event::Message(msg) | Event::ConnectionNotice(msg) => Some(msg),
            Event::Notice(_) | Event::Error(_) => None,
        }
    }
}
