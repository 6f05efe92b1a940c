//! Client configuration.

/// Default chat server host.
pub const DEFAULT_SERVER: &str = "irc.chat.twitch.tv";

/// Default plaintext chat port.
pub const DEFAULT_PORT: u16 = 6667;

/// Capability requested so lines carry tags.
pub const TAGS_CAPABILITY: &str = "twitch.tv/tags";

/// Default size of a single socket read.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024;

/// Default upper bound for one buffered line.
pub const MAX_IRC_LINE_LEN: usize = 8191;

/// Nickname prefix used for anonymous sessions.
pub const GUEST_PREFIX: &str = "justinfan";

/// Settings for a [`Client`](crate::Client).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClientConfig {
    /// Chat server hostname.
    pub server: String,
    /// Chat server port.
    pub port: u16,
    /// Capabilities requested with a single `CAP REQ`.
    pub capabilities: Vec<String>,
    /// Bytes read from the socket per read.
    pub read_chunk_size: usize,
    /// Lines longer than this are dropped.
    pub max_line_len: usize,
    /// Enable TCP keepalive on the socket.
    pub keepalive: bool,
    /// Nickname prefix for anonymous sessions.
    pub guest_prefix: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server: DEFAULT_SERVER.to_owned(),
            port: DEFAULT_PORT,
            capabilities: vec![TAGS_CAPABILITY.to_owned()],
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            max_line_len: MAX_IRC_LINE_LEN,
            keepalive: true,
            guest_prefix: GUEST_PREFIX.to_owned(),
        }
    }
}

impl ClientConfig {
    /// Default settings pointed at another server, e.g. a local test server.
    pub fn with_server(server: impl Into<String>, port: u16) -> ClientConfig {
        ClientConfig {
            server: server.into(),
            port,
            ..ClientConfig::default()
        }
    }
}
