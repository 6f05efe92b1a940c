use std::fmt;

use crate::encode::IrcEncode;

use super::Message;

impl fmt::Display for Message {
    /// Formats the line without its `\r\n` terminator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        let line = String::from_utf8_lossy(&bytes);
        f.write_str(line.trim_end_matches(['\r', '\n']))
    }
}
