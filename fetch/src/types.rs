//! Boundary-level fetch configuration.

use serde::Deserialize;

/// Fetch configuration. Maps to `[fetch]` in config.toml.
///
/// Every field is optional; the accessors return the documented defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FetchConfig {
    /// Target of the "fetch text" action.
    pub text_url: Option<String>,

    /// Target of the "fetch image" action.
    pub image_url: Option<String>,

    /// Caps dial time, in milliseconds. Default: 15000.
    pub connect_timeout_ms: Option<u64>,

    /// Caps each read stall, in milliseconds. Default: 10000.
    pub read_timeout_ms: Option<u64>,

    /// Characters kept from a text response. Default: 1000.
    pub max_text_chars: Option<usize>,

    /// Largest image body accepted, in bytes. Default: 10 MiB.
    pub max_image_bytes: Option<u64>,

    /// User-Agent header sent with every request.
    pub user_agent: Option<String>,

    /// Use system proxy settings (`HTTP_PROXY/HTTPS_PROXY`).
    #[serde(default)]
    pub use_system_proxy: bool,
}

impl FetchConfig {
    pub const DEFAULT_TEXT_URL: &'static str =
        "http://api.openweathermap.org/data/2.5/weather?q=Rome";

    pub const DEFAULT_IMAGE_URL: &'static str = "http://openweathermap.org/img/w/10d.png";

    pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 15_000;

    pub const DEFAULT_READ_TIMEOUT_MS: u64 = 10_000;

    pub const DEFAULT_MAX_TEXT_CHARS: usize = tdnet_types::TextContent::DEFAULT_MAX_CHARS;

    pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

    #[must_use]
    pub fn text_url(&self) -> &str {
        self.text_url.as_deref().unwrap_or(Self::DEFAULT_TEXT_URL)
    }

    #[must_use]
    pub fn image_url(&self) -> &str {
        self.image_url.as_deref().unwrap_or(Self::DEFAULT_IMAGE_URL)
    }

    #[must_use]
    pub fn connect_timeout_ms(&self) -> u64 {
        self.connect_timeout_ms
            .unwrap_or(Self::DEFAULT_CONNECT_TIMEOUT_MS)
    }

    #[must_use]
    pub fn read_timeout_ms(&self) -> u64 {
        self.read_timeout_ms.unwrap_or(Self::DEFAULT_READ_TIMEOUT_MS)
    }

    #[must_use]
    pub fn max_text_chars(&self) -> usize {
        self.max_text_chars.unwrap_or(Self::DEFAULT_MAX_TEXT_CHARS)
    }

    #[must_use]
    pub fn max_image_bytes(&self) -> u64 {
        self.max_image_bytes
            .unwrap_or(Self::DEFAULT_MAX_IMAGE_BYTES)
    }
}
