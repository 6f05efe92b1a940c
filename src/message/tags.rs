//! Vendor tag block decoding and IRCv3 tag value escaping.

use std::collections::BTreeMap;
use std::fmt::{Result as FmtResult, Write};

/// Decoded tag block: key to (unescaped) value.
///
/// A key present without `=` or with an empty value maps to `""`.
pub type Tags = BTreeMap<String, String>;

/// Well-known Twitch tag keys.
pub mod keys {
    /// Chosen display name, may differ from the login in case or script.
    pub const DISPLAY_NAME: &str = "display-name";
    /// Name color as `#RRGGBB`; empty when the user never picked one.
    pub const COLOR: &str = "color";
    /// Comma-separated `set/version` badge list.
    pub const BADGES: &str = "badges";
    /// Slash-separated `id:start-end,...` emote placements.
    pub const EMOTES: &str = "emotes";
}

/// Decode a raw tag block (without the leading `@`).
///
/// Segments are split on `;` and each on its first `=`. Segments with an
/// empty key are skipped; a repeated key keeps its last value.
pub fn decode_tags(raw: &str) -> Tags {
    let mut tags = Tags::new();

    for segment in raw.split(';') {
        if segment.is_empty() {
            continue;
        }

        let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
        if key.is_empty() {
            tracing::trace!(segment, "skipping tag with empty key");
            continue;
        }

        tags.insert(key.to_owned(), unescape_tag_value(value));
    }

    tags
}

/// Escape a tag value for serialization.
///
/// Escapes special characters using the IRCv3 message-tags escaping rules.
pub fn escape_tag_value(f: &mut dyn Write, value: &str) -> FmtResult {
    for c in value.chars() {
        match c {
            ';' => f.write_str("\\:")?,
            ' ' => f.write_str("\\s")?,
            '\\' => f.write_str("\\\\")?,
            '\r' => f.write_str("\\r")?,
            '\n' => f.write_str("\\n")?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Unescape a tag value from wire format.
///
/// Reverses the escaping applied by [`escape_tag_value`].
pub fn unescape_tag_value(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_owned();
    }

    let mut unescaped = String::with_capacity(value.len());
    let mut iter = value.chars();
    while let Some(c) = iter.next() {
        let r = if c == '\\' {
            match iter.next() {
                Some(':') => ';',
                Some('s') => ' ',
                Some('\\') => '\\',
                Some('r') => '\r',
                Some('n') => '\n',
                Some(c) => c,
                None => break,
            }
        } else {
            c
        };
        unescaped.push(r);
    }
    unescaped
}
