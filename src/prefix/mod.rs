//! IRC message prefix (source) types.

use std::fmt;

/// The source of a message: `name[!user][@host]`.
///
/// `name` is a nickname for user-originated lines and a server name for
/// server lines such as `:tmi.twitch.tv 001 ...`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Prefix {
    /// Nickname or server name.
    pub name: String,
    /// Username, when present.
    pub user: Option<String>,
    /// Hostname, when present.
    pub host: Option<String>,
}

impl Prefix {
    /// Parse the text between the leading `:` and the following space.
    ///
    /// Returns `None` when a component that is introduced by its
    /// delimiter is empty (`:!u@h`, `:nick!@h`, `:nick@`).
    pub fn parse(s: &str) -> Option<Prefix> {
        if s.is_empty() || s.contains(' ') {
            return None;
        }

        let (rest, host) = match s.find('@') {
            Some(i) => (&s[..i], Some(&s[i + 1..])),
            None => (s, None),
        };
        let (name, user) = match rest.find('!') {
            Some(i) => (&rest[..i], Some(&rest[i + 1..])),
            None => (rest, None),
        };

        if name.is_empty() || user.is_some_and(str::is_empty) || host.is_some_and(str::is_empty) {
            return None;
        }

        Some(Prefix {
            name: name.to_owned(),
            user: user.map(str::to_owned),
            host: host.map(str::to_owned),
        })
    }

    /// Construct a bare nickname or server name prefix.
    pub fn new(name: impl Into<String>) -> Prefix {
        Prefix {
            name: name.into(),
            user: None,
            host: None,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(user) = &self.user {
            write!(f, "!{}", user)?;
        }
        if let Some(host) = &self.host {
            write!(f, "@{}", host)?;
        }
        Ok(())
    }
}
