//! Line codec for the chat socket.
//!
//! Decoding carves complete lines out of the read buffer; an unterminated
//! remainder stays buffered until the rest of it arrives. Encoding writes a
//! [`Message`] followed by `\r\n`.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::config::MAX_IRC_LINE_LEN;
use crate::encode::IrcEncode;
use crate::error::ProtocolError;
use crate::Message;

/// Splits on `\n`, strips an optional preceding `\r`.
#[derive(Debug, Clone)]
pub struct IrcCodec {
    max_line_len: usize,
    /// Where to resume the newline scan in the buffer.
    next_index: usize,
    /// Dropping bytes until the end of an overlong line.
    discarding: bool,
}

impl IrcCodec {
    /// Codec with the default line length limit.
    pub fn new() -> IrcCodec {
        IrcCodec::with_max_line_len(MAX_IRC_LINE_LEN)
    }

    /// Codec that drops lines longer than `max_line_len` bytes.
    pub fn with_max_line_len(max_line_len: usize) -> IrcCodec {
        IrcCodec {
            max_line_len,
            next_index: 0,
            discarding: false,
        }
    }

    /// The configured line length limit.
    pub fn max_line_len(&self) -> usize {
        self.max_line_len
    }
}

impl Default for IrcCodec {
    fn default() -> Self {
        IrcCodec::new()
    }
}

impl Decoder for IrcCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        loop {
            let newline = src[self.next_index..].iter().position(|&b| b == b'\n');

            match (self.discarding, newline) {
                (true, Some(offset)) => {
                    src.advance(self.next_index + offset + 1);
                    self.next_index = 0;
                    self.discarding = false;
                }
                (true, None) => {
                    src.advance(src.len());
                    self.next_index = 0;
                    return Ok(None);
                }
                (false, Some(offset)) => {
                    let end = self.next_index + offset;
                    self.next_index = 0;

                    let line = src.split_to(end + 1);
                    if end > self.max_line_len {
                        return Err(ProtocolError::LineTooLong {
                            actual: end,
                            limit: self.max_line_len,
                        });
                    }

                    let line = &line[..end];
                    let line = line.strip_suffix(b"\r").unwrap_or(line);
                    return Ok(Some(String::from_utf8_lossy(line).into_owned()));
                }
                (false, None) if src.len() > self.max_line_len => {
                    let actual = src.len();
                    src.advance(actual);
                    self.next_index = 0;
                    self.discarding = true;
                    return Err(ProtocolError::LineTooLong {
                        actual,
                        limit: self.max_line_len,
                    });
                }
                (false, None) => {
                    self.next_index = src.len();
                    return Ok(None);
                }
            }
        }
    }
}

impl Encoder<Message> for IrcCodec {
    type Error = ProtocolError;

    fn encode(&mut self, message: Message, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        message.encode(&mut dst.writer())?;
        Ok(())
    }
}
