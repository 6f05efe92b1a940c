//! Connection manager: socket lifecycle, handshake, and the read loop.
//!
//! One [`Connection`] owns at most one live socket. [`Connection::connect`]
//! tears down any previous socket (waiting for its read loop to exit)
//! before dialing again, so two loops never overlap.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::chan::ChannelExt;
use crate::chat::BadgeSource;
use crate::config::ClientConfig;
use crate::error::{ConnectionError, Result};
use crate::event::Event;
use crate::state::{self, ConnectionState, Credentials, SessionAction, SessionMachine};
use crate::transport::{LineReader, LineWriter, Transport};
use crate::Message;

type SharedWriter = Arc<Mutex<LineWriter<OwnedWriteHalf>>>;

/// Owns the socket of a single chat connection.
pub struct Connection {
    config: Arc<ClientConfig>,
    badges: Arc<dyn BadgeSource>,
    events: mpsc::UnboundedSender<Event>,
    state: Arc<watch::Sender<ConnectionState>>,
    joined: Arc<watch::Sender<Option<String>>>,
    session: Mutex<Option<Session>>,
}

/// A live socket and its read loop.
struct Session {
    channel: String,
    writer: SharedWriter,
    cancel: CancellationToken,
    reader: JoinHandle<()>,
}

impl Session {
    /// Stop the read loop and any in-flight write, then drop the socket.
    async fn shutdown(self) {
        self.cancel.cancel();

        if let Err(e) = self.reader.await {
            if e.is_panic() {
                warn!("read loop panicked");
            }
        }

        // Unflushed bytes are discarded; dropping the last writer handle
        // shuts the write half down.
        debug!(channel = %self.channel, "socket closed");
    }
}

impl Connection {
    /// Create a disconnected manager emitting into `events`.
    pub fn new(
        config: ClientConfig,
        badges: Arc<dyn BadgeSource>,
        events: mpsc::UnboundedSender<Event>,
    ) -> Connection {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        let (joined, _) = watch::channel(None);

        Connection {
            config: Arc::new(config),
            badges,
            events,
            state: Arc::new(state),
            joined: Arc::new(joined),
            session: Mutex::new(None),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Receiver that observes every state transition.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Channel confirmed by the server's JOIN on the current connection.
    pub fn channel(&self) -> Option<String> {
        self.joined.borrow().clone()
    }

    /// Connect, authenticate, and join `channel`.
    ///
    /// Any live connection is fully torn down first. On failure the state is
    /// [`ConnectionState::Disconnected`], the error is returned and also
    /// posted as [`Event::Error`]; nothing is retried.
    pub async fn connect(&self, channel: &str, credentials: Option<Credentials>) -> Result<()> {
        let mut session = self.session.lock().await;

        if let Some(old) = session.take() {
            debug!(channel = %old.channel, "superseding previous connection");
            old.shutdown().await;
        }

        self.joined.send_replace(None);
        self.state.send_replace(ConnectionState::Connecting);

        match self.open(channel, credentials.as_ref()).await {
            Ok(new) => {
                info!(channel = %new.channel, server = %self.config.server, "connected");
                *session = Some(new);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "connect failed");
                self.state.send_replace(ConnectionState::Disconnected);
                let _ = self.events.send(Event::Error(e.clone()));
                Err(e)
            }
        }
    }

    async fn open(&self, channel: &str, credentials: Option<&Credentials>) -> Result<Session> {
        let transport = Transport::connect(&self.config).await?;
        let (reader, mut writer) = transport.into_split();

        for line in state::handshake(&self.config, channel, credentials, guest_suffix()) {
            debug!(line = %redact(&line), "sending");
            writer.send(line).await.map_err(ConnectionError::Write)?;
        }

        self.state.send_replace(ConnectionState::Joined);

        let writer = Arc::new(Mutex::new(writer));
        let cancel = CancellationToken::new();
        let reader = tokio::spawn(read_loop(
            reader,
            Arc::clone(&writer),
            cancel.clone(),
            SessionMachine::new(Arc::clone(&self.badges)),
            self.events.clone(),
            Arc::clone(&self.state),
            Arc::clone(&self.joined),
        ));

        Ok(Session {
            channel: channel.to_channel_name(),
            writer,
            cancel,
            reader,
        })
    }

    /// Close the connection, if any.
    ///
    /// Idempotent. Returns once the read loop has exited; no event is
    /// emitted after that.
    pub async fn disconnect(&self) {
        let mut session = self.session.lock().await;

        if let Some(old) = session.take() {
            info!(channel = %old.channel, "disconnecting");
            old.shutdown().await;
        }

        self.joined.send_replace(None);
        self.state.send_replace(ConnectionState::Disconnected);
    }

    /// Write a message on the live connection.
    ///
    /// The session lock is only held to look up the writer, so a write
    /// stalled on a peer that stopped reading never blocks
    /// [`disconnect`](Self::disconnect); disconnecting aborts it with
    /// [`ConnectionError::NotConnected`]. A write failure disconnects and is
    /// returned to the caller.
    pub async fn send(&self, message: Message) -> Result<()> {
        let (writer, cancel) = {
            let session = self.session.lock().await;
            match session.as_ref().filter(|s| !s.cancel.is_cancelled()) {
                Some(session) => (Arc::clone(&session.writer), session.cancel.clone()),
                None => return Err(ConnectionError::NotConnected),
            }
        };

        // Write polled first: a socket error wins over a concurrent cancel.
        let writer = &writer;
        let sent = tokio::select! {
            biased;
            sent = async move { writer.lock().await.send(message).await } => sent,
            _ = cancel.cancelled() => return Err(ConnectionError::NotConnected),
        };

        if let Err(e) = sent {
            warn!(error = %e, "write failed, disconnecting");
            if !cancel.is_cancelled() {
                cancel.cancel();
                self.joined.send_replace(None);
                self.state.send_replace(ConnectionState::Disconnected);
            }
            return Err(ConnectionError::Write(e));
        }
        Ok(())
    }

    /// Send a chat line to the channel passed to [`connect`](Self::connect).
    pub async fn send_privmsg(&self, text: &str) -> Result<()> {
        let channel = match self.session.lock().await.as_ref() {
            Some(session) => session.channel.clone(),
            None => return Err(ConnectionError::NotConnected),
        };
        self.send(Message::privmsg(&channel, text)).await
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut().take() {
            session.cancel.cancel();
        }
    }
}

/// Keep tokens out of logs.
fn redact(line: &Message) -> String {
    match line.command {
        crate::Command::PASS => "PASS oauth:***".to_owned(),
        _ => line.to_string(),
    }
}

/// Random suffix for anonymous nicknames.
fn guest_suffix() -> u32 {
    let mut bytes = [0u8; 4];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => u32::from_ne_bytes(bytes),
        Err(e) => {
            warn!(error = %e, "no OS randomness, falling back to clock");
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos())
                .unwrap_or_default()
        }
    }
}

/// Reads lines until cancelled or the socket fails.
///
/// Lines are dispatched in read order. A PING is answered before the next
/// line is looked at.
async fn read_loop(
    mut reader: LineReader<tokio::net::tcp::OwnedReadHalf>,
    writer: SharedWriter,
    cancel: CancellationToken,
    mut machine: SessionMachine,
    events: mpsc::UnboundedSender<Event>,
    state: Arc<watch::Sender<ConnectionState>>,
    joined: Arc<watch::Sender<Option<String>>>,
) {
    let fail = |error: ConnectionError| {
        if cancel.is_cancelled() {
            return;
        }
        warn!(error = %error, "connection lost");
        cancel.cancel();
        state.send_replace(ConnectionState::Disconnected);
        joined.send_replace(None);
        let _ = events.send(Event::Error(error));
    };

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = reader.next_line() => next,
        };

        let line = match next {
            Ok(line) => line,
            Err(error) => {
                fail(error);
                break;
            }
        };

        let Some(message) = Message::parse(&line) else {
            continue;
        };

        match machine.feed(&message) {
            Some(SessionAction::Send(reply)) => {
                let writer = &writer;
                let sent = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    sent = async move { writer.lock().await.send(*reply).await } => sent,
                };
                if let Err(e) = sent {
                    fail(ConnectionError::Write(e));
                    break;
                }
            }
            Some(SessionAction::Emit(event)) => {
                if cancel.is_cancelled() {
                    break;
                }
                if let Some(channel) = machine.channel() {
                    if joined.borrow().as_deref() != Some(channel) {
                        joined.send_replace(Some(channel.to_owned()));
                    }
                }
                if events.send(event).is_err() {
                    debug!("event receiver dropped");
                }
            }
            None => {}
        }
    }

    debug!("read loop exited");
}
