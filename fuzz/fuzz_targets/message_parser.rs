//! Fuzz target for chat line parsing
//!
//! Feeds arbitrary input through the parser and the chat message builder,
//! checking that neither panics.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;

use twitched_irc::chat::{self, BadgeTable};
use twitched_irc::Message;

fuzz_target!(|data: &[u8]| {
    // The socket decodes lossily, so every byte string reaches the parser.
    let input = String::from_utf8_lossy(data);
    if input.len() > twitched_irc::MAX_IRC_LINE_LEN {
        return;
    }

    if let Some(msg) = Message::parse(&input) {
        let _ = chat::build(&msg, &BadgeTable::new());

        // Anything that parsed must serialize without panicking.
        let _ = msg.to_string();
    }

    let _ = str::from_utf8(data).map(|s| s.parse::<Message>());
});
