//! Resolved configuration.
//!
//! Converts optional, boundary-level configuration into concrete values so the
//! fetch path never handles `Option`s or raw millisecond counts.
use std::time::Duration;

use crate::types::FetchConfig;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("tdnet/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub text_url: String,
    pub image_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub max_text_chars: usize,
    pub max_image_bytes: usize,
    pub user_agent: String,
    pub use_system_proxy: bool,
}

impl ResolvedConfig {
    #[must_use]
    pub fn from_config(config: &FetchConfig) -> Self {
        let user_agent = config
            .user_agent
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        // A zero timeout would fail every request immediately.
        let connect_timeout = Duration::from_millis(config.connect_timeout_ms().max(1));
        let read_timeout = Duration::from_millis(config.read_timeout_ms().max(1));

        let max_image_bytes = usize::try_from(config.max_image_bytes()).unwrap_or(usize::MAX);

        Self {
            text_url: config.text_url().to_string(),
            image_url: config.image_url().to_string(),
            connect_timeout,
            read_timeout,
            max_text_chars: config.max_text_chars(),
            max_image_bytes,
            user_agent,
            use_system_proxy: config.use_system_proxy,
        }
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}
