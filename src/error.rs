//! Error types for the chat client.
//!
//! This module defines error types for message parsing failures,
//! line-codec faults, and connection-level network faults.

use thiserror::Error;

/// Convenience type alias for Results using [`ConnectionError`].
pub type Result<T, E = ConnectionError> = std::result::Result<T, E>;

/// Errors encountered when parsing IRC messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Message was empty (or only a line terminator).
    #[error("empty message")]
    EmptyMessage,

    /// The line does not follow the grammar; no command token was found.
    #[error("syntax error at byte {position} while {context}")]
    Syntax {
        /// Byte offset where parsing stopped.
        position: usize,
        /// What was being parsed at that point.
        context: &'static str,
    },

    /// The prefix has an empty nickname, user, or host.
    #[error("invalid prefix: {0:?}")]
    InvalidPrefix(String),
}

/// Errors raised by the line codec.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line exceeded the configured maximum length and was dropped.
    #[error("line too long: {actual} bytes (limit {limit})")]
    LineTooLong {
        /// Bytes buffered when the limit was hit.
        actual: usize,
        /// The configured limit.
        limit: usize,
    },
}

/// Transient network faults reported by the connection manager.
///
/// None of these end the program: the connection transitions to
/// [`ConnectionState::Disconnected`](crate::state::ConnectionState) and the
/// error is surfaced to the consumer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConnectionError {
    /// Hostname resolution failed.
    #[error("failed to resolve {host}: {source}")]
    Resolve {
        /// Host that was looked up.
        host: String,
        /// Underlying resolver error.
        #[source]
        source: std::io::Error,
    },

    /// Hostname resolved to no addresses.
    #[error("no address found for {0}")]
    NoAddress(String),

    /// TCP connect failed.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        /// Address that was dialed.
        addr: std::net::SocketAddr,
        /// Underlying socket error.
        #[source]
        source: std::io::Error,
    },

    /// Writing a command to the socket failed.
    #[error("write error: {0}")]
    Write(#[source] ProtocolError),

    /// Reading from the socket failed.
    #[error("read error: {0}")]
    Read(#[source] std::io::Error),

    /// The server closed the connection.
    #[error("connection closed by server")]
    Closed,

    /// A command was sent while no connection was live.
    #[error("not connected")]
    NotConnected,
}

/// `io::Error` is not `Clone`; copies keep the kind and the message.
fn copy_io(e: &std::io::Error) -> std::io::Error {
    std::io::Error::new(e.kind(), e.to_string())
}

impl Clone for ProtocolError {
    fn clone(&self) -> Self {
        match self {
            ProtocolError::Io(e) => ProtocolError::Io(copy_io(e)),
            ProtocolError::LineTooLong { actual, limit } => ProtocolError::LineTooLong {
                actual: *actual,
                limit: *limit,
            },
        }
    }
}

impl Clone for ConnectionError {
    fn clone(&self) -> Self {
        match self {
            ConnectionError::Resolve { host, source } => ConnectionError::Resolve {
                host: host.clone(),
                source: copy_io(source),
            },
            ConnectionError::NoAddress(host) => ConnectionError::NoAddress(host.clone()),
            ConnectionError::Connect { addr, source } => ConnectionError::Connect {
                addr: *addr,
                source: copy_io(source),
            },
            ConnectionError::Write(e) => ConnectionError::Write(e.clone()),
            ConnectionError::Read(e) => ConnectionError::Read(copy_io(e)),
            ConnectionError::Closed => ConnectionError::Closed,
            ConnectionError::NotConnected => ConnectionError::NotConnected,
        }
    }
}
