//! Byte-level encoding for outgoing IRC lines.
//!
//! The [`IrcEncode`] trait writes a message straight into any
//! [`Write`] implementor (a `Vec<u8>`, a socket buffer, ...).
//!
//! # Example
//!
//! ```
//! use twitched_irc::encode::IrcEncode;
//! use twitched_irc::Message;
//!
//! let msg = Message::privmsg("#channel", "Hello!");
//! let mut buf = Vec::new();
//! msg.encode(&mut buf).unwrap();
//!
//! assert_eq!(&buf, b"PRIVMSG #channel :Hello!\r\n");
//! ```

use std::io::{self, Write};

use crate::message::tags::escape_tag_value;
use crate::message::Message;

/// A trait for encoding IRC protocol elements directly to a byte stream.
pub trait IrcEncode {
    /// Encode this value to the given writer.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the write fails.
    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<usize>;

    /// Encode this value to a new `Vec<u8>`.
    #[must_use]
    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(512);
        let _ = self.encode(&mut buf);
        buf
    }
}

/// Check if a lone argument needs colon-prefixing to survive re-parsing.
#[inline]
pub(crate) fn needs_colon_prefix(s: &str) -> bool {
    s.is_empty() || s.contains(' ') || s.starts_with(':')
}

/// Write a command with its arguments.
///
/// A single argument is written bare unless it would not re-parse as one
/// parameter. With two or more arguments the last one is always written as
/// a `:`-prefixed trailing parameter.
pub(crate) fn write_cmd<W: Write>(w: &mut W, cmd: &[u8], args: &[&str]) -> io::Result<usize> {
    let mut written = w.write(cmd)?;

    let Some((last, middle)) = args.split_last() else {
        return Ok(written);
    };

    for arg in middle {
        written += w.write(b" ")?;
        written += w.write(arg.as_bytes())?;
    }

    written += w.write(b" ")?;
    if !middle.is_empty() || needs_colon_prefix(last) {
        written += w.write(b":")?;
    }
    written += w.write(last.as_bytes())?;
    Ok(written)
}

impl IrcEncode for Message {
    fn encode<W: Write>(&self, w: &mut W) -> io::Result<usize> {
        let mut written = 0;

        if !self.tags.is_empty() {
            let mut block = String::from("@");
            for (i, (key, value)) in self.tags.iter().enumerate() {
                if i > 0 {
                    block.push(';');
                }
                block.push_str(key);
                if !value.is_empty() {
                    block.push('=');
                    escape_tag_value(&mut block, value).map_err(|_| io::ErrorKind::Other)?;
                }
            }
            block.push(' ');
            written += w.write(block.as_bytes())?;
        }

        if let Some(prefix) = &self.prefix {
            written += w.write(format!(":{} ", prefix).as_bytes())?;
        }

        let args: Vec<&str> = self.params.iter().map(String::as_str).collect();
        written += write_cmd(w, self.command.name().as_bytes(), &args)?;
        written += w.write(b"\r\n")?;
        Ok(written)
    }
}
