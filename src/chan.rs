//! Channel name helpers.

/// Extension methods for turning stream logins into channel names.
pub trait ChannelExt {
    /// Whether this already looks like a channel name (`#...`).
    fn is_channel_name(&self) -> bool;

    /// Lowercase channel name with a single leading `#`.
    ///
    /// `"SomeStreamer"` and `"#somestreamer"` both become `"#somestreamer"`.
    fn to_channel_name(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> ChannelExt for T {
    fn is_channel_name(&self) -> bool {
        let s = self.as_ref();
        s.len() > 1 && s.starts_with('#')
    }

    fn to_channel_name(&self) -> String {
        let login = self.as_ref().trim().trim_start_matches('#');
        format!("#{}", login.to_lowercase())
    }
}
