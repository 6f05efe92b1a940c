mod types;

pub use types::Command;
