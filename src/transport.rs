//! TCP transport for the chat socket.
//!
//! [`Transport::connect`] resolves and dials the server, then the socket is
//! split into a [`LineReader`] owned by the read loop and a [`LineWriter`]
//! shared (behind a lock) by everything that sends commands.

use bytes::BytesMut;
use futures_util::SinkExt;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio_util::codec::{Decoder, FramedWrite};
use tracing::{debug, warn};

use crate::codec::IrcCodec;
use crate::config::ClientConfig;
use crate::error::{ConnectionError, ProtocolError};
use crate::Message;

/// A connected chat socket.
pub struct Transport {
    stream: TcpStream,
    read_chunk_size: usize,
    max_line_len: usize,
}

impl Transport {
    /// Resolve `config.server` and open a TCP connection to the first
    /// address returned.
    pub async fn connect(config: &ClientConfig) -> Result<Transport, ConnectionError> {
        let host = config.server.as_str();

        let mut addrs = tokio::net::lookup_host((host, config.port))
            .await
            .map_err(|source| ConnectionError::Resolve {
                host: host.to_owned(),
                source,
            })?;
        let addr = addrs
            .next()
            .ok_or_else(|| ConnectionError::NoAddress(host.to_owned()))?;

        debug!(%addr, "connecting");
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ConnectionError::Connect { addr, source })?;

        Ok(Transport::tcp(stream, config))
    }

    /// Wrap an already connected stream.
    pub fn tcp(stream: TcpStream, config: &ClientConfig) -> Transport {
        if config.keepalive {
            if let Err(e) = Self::enable_keepalive(&stream) {
                warn!("failed to enable TCP keepalive: {}", e);
            }
        }
        if let Err(e) = stream.set_nodelay(true) {
            debug!("failed to set TCP_NODELAY: {}", e);
        }

        Transport {
            stream,
            read_chunk_size: config.read_chunk_size.max(1),
            max_line_len: config.max_line_len,
        }
    }

    fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
        use socket2::{SockRef, TcpKeepalive};
        use std::time::Duration;

        let sock = SockRef::from(stream);
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(120))
            .with_interval(Duration::from_secs(30));

        sock.set_tcp_keepalive(&keepalive)
    }

    /// Split into independently owned read and write halves.
    pub fn into_split(self) -> (LineReader<OwnedReadHalf>, LineWriter<OwnedWriteHalf>) {
        let (read, write) = self.stream.into_split();
        (
            LineReader::new(read, self.read_chunk_size, self.max_line_len),
            LineWriter::new(write, self.max_line_len),
        )
    }
}

/// Reads fixed-size chunks into a byte buffer and yields complete lines.
pub struct LineReader<R> {
    reader: R,
    codec: IrcCodec,
    buffer: BytesMut,
    chunk: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    /// Wrap `reader`, reading at most `chunk_size` bytes per read.
    pub fn new(reader: R, chunk_size: usize, max_line_len: usize) -> LineReader<R> {
        LineReader {
            reader,
            codec: IrcCodec::with_max_line_len(max_line_len),
            buffer: BytesMut::with_capacity(chunk_size * 4),
            chunk: vec![0; chunk_size.max(1)],
        }
    }

    /// Next complete line, without its terminator.
    ///
    /// Lines already buffered are returned without reading. Overlong lines
    /// are dropped with a warning. Returns [`ConnectionError::Closed`] on
    /// end of stream and [`ConnectionError::Read`] on socket errors.
    ///
    /// Cancel safe: dropping the future loses no buffered bytes.
    pub async fn next_line(&mut self) -> Result<String, ConnectionError> {
        loop {
            match self.codec.decode(&mut self.buffer) {
                Ok(Some(line)) => return Ok(line),
                Ok(None) => {}
                Err(ProtocolError::LineTooLong { actual, limit }) => {
                    warn!(actual, limit, "dropping overlong line");
                    continue;
                }
                Err(ProtocolError::Io(e)) => return Err(ConnectionError::Read(e)),
            }

            let n = self
                .reader
                .read(&mut self.chunk)
                .await
                .map_err(ConnectionError::Read)?;
            if n == 0 {
                return Err(ConnectionError::Closed);
            }
            self.buffer.extend_from_slice(&self.chunk[..n]);
        }
    }

    /// Bytes received but not yet returned as a line.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }
}

/// Serializes messages onto the write half.
pub struct LineWriter<W> {
    framed: FramedWrite<W, IrcCodec>,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    /// Wrap `writer`.
    pub fn new(writer: W, max_line_len: usize) -> LineWriter<W> {
        LineWriter {
            framed: FramedWrite::new(writer, IrcCodec::with_max_line_len(max_line_len)),
        }
    }

    /// Write one message and flush it.
    pub async fn send(&mut self, message: Message) -> Result<(), ProtocolError> {
        self.framed.send(message).await
    }

    /// Flush and shut down the write side.
    pub async fn close(&mut self) -> Result<(), ProtocolError> {
        self.framed.close().await
    }
}
