use std::fmt;
use std::str::FromStr;

/// An 8-bit RGB name color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Used when a user has no (or an unreadable) color tag.
    pub const GREEN: Rgb = Rgb(0, 255, 0);

    /// Parse `#RRGGBB` or `RRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let value = u32::from_str_radix(digits, 16).ok()?;
        Some(Rgb(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        ))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::GREEN
    }
}

impl FromStr for Rgb {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s).ok_or_else(|| InvalidColor(s.to_owned()))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// A color tag value that is not six hex digits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color: {0:?}")]
pub struct InvalidColor(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#0000FF"), Some(Rgb(0, 0, 255)));
        assert_eq!(Rgb::from_hex("1e90ff"), Some(Rgb(0x1e, 0x90, 0xff)));
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(Rgb::from_hex(""), None);
        assert_eq!(Rgb::from_hex("#FFF"), None);
        assert_eq!(Rgb::from_hex("#GGGGGG"), None);
        assert_eq!(Rgb::from_hex("#+12345"), None);
        assert!("nope".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Rgb(255, 0, 16).to_string(), "#FF0010");
        assert_eq!(Rgb::default(), Rgb::GREEN);
    }
}
