//! Consumer-facing façade over the connection manager.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use twitched_irc::{BadgeTable, Client, ClientConfig, Event};
//!
//! # async fn run() -> twitched_irc::error::Result<()> {
//! let (client, mut events) = Client::new(ClientConfig::default(), Arc::new(BadgeTable::new()));
//! client.connect("somestreamer", None).await?;
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         Event::Message(msg) => println!("{}: {}", msg.display_name, msg.body),
//!         Event::Error(e) => eprintln!("disconnected: {}", e),
//!         _ => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::{mpsc, watch};

pub use tokio::sync::mpsc::error::TryRecvError;

use crate::chat::BadgeSource;
use crate::config::ClientConfig;
use crate::connection::Connection;
use crate::error::Result;
use crate::event::Event;
use crate::state::{ConnectionState, Credentials};
use crate::Message;

/// Handle for one chat connection.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct Client {
    connection: Connection,
}

impl Client {
    /// Create a disconnected client and the stream its events arrive on.
    pub fn new(config: ClientConfig, badges: impl BadgeSource + 'static) -> (Client, Events) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Client {
            connection: Connection::new(config, Arc::new(badges), tx),
        };
        (client, Events { rx })
    }

    /// Connect to the server and join `channel`.
    ///
    /// Anonymous when `credentials` is `None`. A live connection is torn
    /// down first.
    pub async fn connect(&self, channel: &str, credentials: Option<Credentials>) -> Result<()> {
        self.connection.connect(channel, credentials).await
    }

    /// Close the connection. Safe to call when already disconnected.
    pub async fn disconnect(&self) {
        self.connection.disconnect().await
    }

    /// Send `text` to the connected channel.
    pub async fn send_privmsg(&self, text: &str) -> Result<()> {
        self.connection.send_privmsg(text).await
    }

    /// Send an arbitrary message on the live connection.
    pub async fn send(&self, message: Message) -> Result<()> {
        self.connection.send(message).await
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Observe state transitions.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.connection.watch_state()
    }

    /// Channel the server confirmed joining, if any.
    pub fn channel(&self) -> Option<String> {
        self.connection.channel()
    }
}

/// Events from a [`Client`], in the order lines arrived on the socket.
///
/// Ends once the [`Client`] is dropped and all buffered events are read.
pub struct Events {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl Events {
    /// Wait for the next event.
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Take an already delivered event without waiting.
    ///
    /// [`TryRecvError::Empty`] means nothing is queued yet;
    /// [`TryRecvError::Disconnected`] means the stream has ended.
    pub fn try_recv(&mut self) -> Result<Event, TryRecvError> {
        self.rx.try_recv()
    }
}

impl Stream for Events {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        self.rx.poll_recv(cx)
    }
}
