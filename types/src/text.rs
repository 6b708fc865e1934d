//! Character-bounded text payloads.

use std::fmt;

/// Upper bound on bytes needed to hold `chars` UTF-8 scalar values.
///
/// Reading this many bytes from a longer body always yields at least `chars`
/// complete characters, so truncating the decoded prefix never cuts a
/// character in half.
#[must_use]
pub const fn max_utf8_bytes(chars: usize) -> usize {
    chars.saturating_mul(4)
}

/// Decoded response text holding at most a fixed number of characters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextContent(String);

impl TextContent {
    /// Character cap applied to fetched text unless configured otherwise.
    pub const DEFAULT_MAX_CHARS: usize = 1000;

    /// Decode `bytes` as UTF-8 and keep the first `max_chars` characters.
    ///
    /// Invalid sequences become U+FFFD instead of failing the whole read.
    #[must_use]
    pub fn from_utf8_prefix(bytes: &[u8], max_chars: usize) -> Self {
        let decoded = String::from_utf8_lossy(bytes);
        Self(decoded.chars().take(max_chars).collect())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TextContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
