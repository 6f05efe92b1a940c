//! Display-ready chat messages built from parsed `PRIVMSG` lines.
//!
//! Building is pure: given a [`Message`] and a [`BadgeTable`] snapshot it
//! resolves the display name, name color, badge images and ordered emote
//! placements. No network I/O happens here; image bytes are fetched by
//! whoever renders the message.
//!
//! ```
//! use twitched_irc::chat::{self, BadgeTable, Rgb};
//! use twitched_irc::Message;
//!
//! let line = Message::parse(":tester!user@host PRIVMSG #chan :Hello\r\n").unwrap();
//! let msg = chat::build(&line, &BadgeTable::new());
//!
//! assert_eq!(msg.display_name, "tester");
//! assert_eq!(msg.body, "Hello");
//! assert_eq!(msg.color, Rgb::GREEN);
//! ```

mod badge;
mod color;
mod emote;

pub use self::badge::{BadgeSource, BadgeTable};
pub use self::color::{InvalidColor, Rgb};
pub use self::emote::{emote_url, parse_emotes, Emote, EMOTE_SIZE, EMOTE_URL_TEMPLATE};

use crate::message::tags::keys;
use crate::message::Message;

/// A chat line ready for display.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChatMessage {
    /// Name to show for the sender.
    pub display_name: String,
    /// Message text.
    pub body: String,
    /// Sender name color.
    pub color: Rgb,
    /// Badge image URLs, in the order the server listed the badges.
    pub badge_image_urls: Vec<String>,
    /// Emote placements sorted by start offset.
    pub emotes: Vec<Emote>,
}

impl ChatMessage {
    /// A synthetic message with no badges or emotes.
    pub fn system(display_name: impl Into<String>, body: impl Into<String>) -> ChatMessage {
        ChatMessage {
            display_name: display_name.into(),
            body: body.into(),
            color: Rgb::GREEN,
            badge_image_urls: Vec::new(),
            emotes: Vec::new(),
        }
    }
}

/// Build a [`ChatMessage`] from a parsed `PRIVMSG`.
///
/// Missing or malformed tags degrade to defaults (source nickname, green,
/// no badges, no emotes); building never fails.
pub fn build(message: &Message, badges: &BadgeTable) -> ChatMessage {
    let display_name = match message.tag(keys::DISPLAY_NAME) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => message.source_name().to_owned(),
    };

    let color = message
        .tag(keys::COLOR)
        .and_then(Rgb::from_hex)
        .unwrap_or(Rgb::GREEN);

    let badge_image_urls = message
        .tag(keys::BADGES)
        .map(|raw| badges.resolve(raw))
        .unwrap_or_default();

    let emotes = message
        .tag(keys::EMOTES)
        .map(parse_emotes)
        .unwrap_or_default();

    ChatMessage {
        display_name,
        body: message.param(1).unwrap_or_default().to_owned(),
        color,
        badge_image_urls,
        emotes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Message {
        Message::parse(line).unwrap()
    }

    #[test]
    fn test_untagged_privmsg() {
        let msg = build(
            &parse(":tester!user@host PRIVMSG #chan :Hello\r\n"),
            &BadgeTable::new(),
        );
        assert_eq!(
            msg,
            ChatMessage {
                display_name: "tester".to_string(),
                body: "Hello".to_string(),
                color: Rgb(0, 255, 0),
                badge_image_urls: vec![],
                emotes: vec![],
            }
        );
    }

    #[test]
    fn test_tagged_privmsg() {
        let badges: BadgeTable = [("subscriber", "6", "url1")].into_iter().collect();
        let line = "@badges=subscriber/6,premium/1;color=#1E90FF;display-name=Tester;\
                    emotes=25:6-10/100:0-3 :tester!tester@tester.tmi.twitch.tv \
                    PRIVMSG #chan :Kappa hello Kappa";
        let msg = build(&parse(line), &badges);

        assert_eq!(msg.display_name, "Tester");
        assert_eq!(msg.body, "Kappa hello Kappa");
        assert_eq!(msg.color, Rgb(0x1e, 0x90, 0xff));
        assert_eq!(msg.badge_image_urls, vec!["url1"]);
        assert_eq!(
            msg.emotes.iter().map(|e| e.start).collect::<Vec<_>>(),
            vec![0, 6]
        );
    }

    #[test]
    fn test_empty_display_name_falls_back_to_nick() {
        let msg = build(
            &parse("@display-name= :nick!nick@host PRIVMSG #chan :x"),
            &BadgeTable::new(),
        );
        assert_eq!(msg.display_name, "nick");
    }

    #[test]
    fn test_unset_color_is_green() {
        let msg = build(
            &parse("@color= :nick PRIVMSG #chan :x"),
            &BadgeTable::new(),
        );
        assert_eq!(msg.color, Rgb::GREEN);

        let msg = build(
            &parse("@color=blue :nick PRIVMSG #chan :x"),
            &BadgeTable::new(),
        );
        assert_eq!(msg.color, Rgb::GREEN);
    }

    #[test]
    fn test_missing_body_is_empty() {
        let msg = build(&parse(":nick PRIVMSG #chan"), &BadgeTable::new());
        assert_eq!(msg.body, "");
    }

    #[test]
    fn test_system_message() {
        let msg = ChatMessage::system("#chan", "connected");
        assert_eq!(msg.display_name, "#chan");
        assert_eq!(msg.body, "connected");
        assert!(msg.badge_image_urls.is_empty());
        assert!(msg.emotes.is_empty());
    }
}
