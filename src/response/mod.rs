//! Numeric server replies recognized by the client.
//!
//! Twitch chat only ever sends a handful of numerics: the registration
//! burst (001-004), the message of the day (372/375/376), and the name
//! list that follows a JOIN (353/366). Anything else maps to
//! [`Command::Unknown`](crate::command::Command::Unknown).

#![allow(non_camel_case_types)]

use std::str::FromStr;

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    // === Connection Registration ===
    /// 001 - Welcome to the IRC network
    RPL_WELCOME = 1,
    /// 002 - Your host is running version
    RPL_YOURHOST = 2,
    /// 003 - Server creation date
    RPL_CREATED = 3,
    /// 004 - Server info
    RPL_MYINFO = 4,

    // === Name list ===
    /// 353 - Names in a channel
    RPL_NAMREPLY = 353,
    /// 366 - End of names list
    RPL_ENDOFNAMES = 366,

    // === Message of the day ===
    /// 372 - MOTD line
    RPL_MOTD = 372,
    /// 375 - Start of MOTD
    RPL_MOTDSTART = 375,
    /// 376 - End of MOTD
    RPL_ENDOFMOTD = 376,
}

impl Response {
    /// Returns the numeric code as u16
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Creates a Response from a numeric code
    pub fn from_code(code: u16) -> Option<Response> {
        Some(match code {
            1 => Response::RPL_WELCOME,
            2 => Response::RPL_YOURHOST,
            3 => Response::RPL_CREATED,
            4 => Response::RPL_MYINFO,
            353 => Response::RPL_NAMREPLY,
            366 => Response::RPL_ENDOFNAMES,
            372 => Response::RPL_MOTD,
            375 => Response::RPL_MOTDSTART,
            376 => Response::RPL_ENDOFMOTD,
            _ => return None,
        })
    }

    /// Whether this reply belongs to the message of the day.
    pub fn is_motd(&self) -> bool {
        matches!(
            self,
            Response::RPL_MOTD | Response::RPL_MOTDSTART | Response::RPL_ENDOFMOTD
        )
    }

    /// Whether this reply belongs to a channel name list.
    pub fn is_names(&self) -> bool {
        matches!(self, Response::RPL_NAMREPLY | Response::RPL_ENDOFNAMES)
    }
}

impl FromStr for Response {
    type Err = ParseResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 3 {
            return Err(ParseResponseError::InvalidFormat);
        }
        let code: u16 = s.parse().map_err(|_| ParseResponseError::InvalidFormat)?;
        Response::from_code(code).ok_or(ParseResponseError::UnknownCode(code))
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

/// Error when parsing a response code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseResponseError {
    /// The string was not a three-digit number
    #[error("invalid response code format")]
    InvalidFormat,
    /// The numeric code is not a known response
    #[error("unknown response code: {0}")]
    UnknownCode(u16),
}
