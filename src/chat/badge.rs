//! Badge lookup table and badge tag resolution.

use std::collections::HashMap;
use std::sync::Arc;

/// Badge set name -> version -> image URL.
///
/// Supplied by whoever fetches the chat badge API; this crate only reads it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(from = "wire::BadgeSets")
)]
pub struct BadgeTable {
    sets: HashMap<String, HashMap<String, String>>,
}

impl BadgeTable {
    /// An empty table; every badge resolves to nothing.
    pub fn new() -> BadgeTable {
        BadgeTable::default()
    }

    /// Register the image URL for `set/version`.
    pub fn insert(
        &mut self,
        set: impl Into<String>,
        version: impl Into<String>,
        image_url: impl Into<String>,
    ) {
        self.sets
            .entry(set.into())
            .or_default()
            .insert(version.into(), image_url.into());
    }

    /// Image URL for `set/version`, if known.
    pub fn get(&self, set: &str, version: &str) -> Option<&str> {
        self.sets.get(set)?.get(version).map(String::as_str)
    }

    /// Number of badge sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether the table has no badge sets.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Resolve a `badges` tag value (`set/version,set/version,...`).
    ///
    /// Order is preserved; pairs that are malformed or missing from the
    /// table are dropped.
    pub fn resolve(&self, raw: &str) -> Vec<String> {
        raw.split(',')
            .filter(|pair| !pair.is_empty())
            .filter_map(|pair| {
                let Some((set, version)) = pair.split_once('/') else {
                    tracing::trace!(pair, "skipping malformed badge");
                    return None;
                };
                let url = self.get(set, version);
                if url.is_none() {
                    tracing::trace!(set, version, "no image for badge");
                }
                url.map(str::to_owned)
            })
            .collect()
    }
}

impl<S, V, U> FromIterator<(S, V, U)> for BadgeTable
where
    S: Into<String>,
    V: Into<String>,
    U: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, V, U)>>(iter: I) -> Self {
        let mut table = BadgeTable::new();
        for (set, version, url) in iter {
            table.insert(set, version, url);
        }
        table
    }
}

/// Something that can hand out the current badge table.
///
/// The builder takes one snapshot per message and never waits for updates.
pub trait BadgeSource: Send + Sync {
    /// The table as of now.
    fn snapshot(&self) -> Arc<BadgeTable>;
}

impl BadgeSource for Arc<BadgeTable> {
    fn snapshot(&self) -> Arc<BadgeTable> {
        Arc::clone(self)
    }
}

#[cfg(feature = "tokio")]
impl BadgeSource for tokio::sync::watch::Receiver<Arc<BadgeTable>> {
    fn snapshot(&self) -> Arc<BadgeTable> {
        Arc::clone(&self.borrow())
    }
}

#[cfg(feature = "serde")]
mod wire {
    //! Shape of the badge API response.

    use std::collections::HashMap;

    use serde::Deserialize;

    #[derive(Deserialize)]
    pub(super) struct BadgeSets {
        #[serde(default)]
        badge_sets: HashMap<String, BadgeSet>,
    }

    #[derive(Deserialize)]
    struct BadgeSet {
        #[serde(default)]
        versions: HashMap<String, Badge>,
    }

    #[derive(Deserialize)]
    struct Badge {
        image_url_4x: String,
    }

    impl From<BadgeSets> for super::BadgeTable {
        fn from(raw: BadgeSets) -> Self {
            let sets = raw
                .badge_sets
                .into_iter()
                .map(|(name, set)| {
                    let versions = set
                        .versions
                        .into_iter()
                        .map(|(version, badge)| (version, badge.image_url_4x))
                        .collect();
                    (name, versions)
                })
                .collect();
            super::BadgeTable { sets }
        }
    }
}
