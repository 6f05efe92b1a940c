mod nom_parser;
mod parse;
mod serialize;
pub mod tags;
mod types;

pub use self::nom_parser::RawMessage;
pub use self::tags::Tags;
pub use self::types::Message;
