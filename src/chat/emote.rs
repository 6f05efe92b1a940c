//! Emote tag decoding.

/// Image URL template; `{id}` and `{size}` are substituted.
pub const EMOTE_URL_TEMPLATE: &str = "http://static-cdn.jtvnw.net/emoticons/v1/{id}/{size}";

/// Size token substituted into [`EMOTE_URL_TEMPLATE`].
pub const EMOTE_SIZE: &str = "4.0";

/// An emote image placed over `body[start..=end]`.
///
/// Offsets are the inclusive character offsets the server sent; they are
/// not validated against the body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Emote {
    /// Image URL for this emote.
    pub image_url: String,
    /// First covered offset.
    pub start: usize,
    /// Last covered offset (inclusive).
    pub end: usize,
}

/// Image URL for an emote id.
pub fn emote_url(id: &str) -> String {
    EMOTE_URL_TEMPLATE
        .replace("{id}", id)
        .replace("{size}", EMOTE_SIZE)
}

/// Decode an `emotes` tag value, ordered by start offset.
///
/// The value is `/`-separated groups of `id:start-end,start-end,...`.
/// Malformed groups and ranges are skipped. Entries sharing a start offset
/// are all kept, in the order they appeared in the tag.
pub fn parse_emotes(raw: &str) -> Vec<Emote> {
    let mut emotes = Vec::new();

    for group in raw.split('/').filter(|g| !g.is_empty()) {
        let Some((id, ranges)) = group.split_once(':') else {
            tracing::trace!(group, "skipping emote group without ranges");
            continue;
        };
        if id.is_empty() {
            continue;
        }

        let url = emote_url(id);
        for range in ranges.split(',') {
            match parse_range(range) {
                Some((start, end)) => emotes.push(Emote {
                    image_url: url.clone(),
                    start,
                    end,
                }),
                None => tracing::trace!(id, range, "skipping malformed emote range"),
            }
        }
    }

    // Stable: ties keep tag order.
    emotes.sort_by_key(|emote| emote.start);
    emotes
}

fn parse_range(range: &str) -> Option<(usize, usize)> {
    let mut parts = range.split('-');
    let start = parts.next()?.parse().ok()?;
    let end = parts.next()?.parse().ok()?;
    if parts.next().is_some() || end < start {
        return None;
    }
    Some((start, end))
}
