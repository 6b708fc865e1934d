//! Text and image fetching for tdnet.
//!
//! The fetch operations here run on worker tasks, never on the consumer
//! thread. Each one parses its target, performs a single GET through a
//! [`Transport`] and turns the body into a payload, reporting every failure as
//! a [`FetchError`] value.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `types` | Boundary configuration (`[fetch]` in config.toml) |
//! | `resolved` | Configuration with defaults applied and timeouts as `Duration`s |
//! | `http` | `Transport` seam and the `reqwest`-backed implementation |
//! | `decode` | `ImageDecoder` seam and the `image`-backed implementation |
//!
//! # Usage
//!
//! ```ignore
//! use tdnet_fetch::{HttpTransport, ResolvedConfig, fetch_text};
//!
//! let config = ResolvedConfig::default();
//! let transport = HttpTransport::new(&config)?;
//! let text = fetch_text(&transport, &config.text_url, config.max_text_chars).await?;
//! ```

mod decode;
mod http;
mod resolved;
mod types;

use std::sync::Arc;

use tdnet_types::{FetchError, ImageBitmap, TextContent, max_utf8_bytes};
use url::Url;

pub use decode::{ImageDecoder, StandardDecoder};
pub use http::{ClientBuildError, HttpTransport, Transport};
pub use resolved::ResolvedConfig;
pub use types::FetchConfig;

/// Parse a fetch target, accepting only absolute http(s) URLs with a host.
pub fn parse_target(raw: &str) -> Result<Url, FetchError> {
    let malformed = |reason: String| FetchError::MalformedTarget {
        target: raw.to_string(),
        reason,
    };

    if raw.trim().is_empty() {
        return Err(malformed("target must not be empty".to_string()));
    }

    let url = Url::parse(raw.trim()).map_err(|e| malformed(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(malformed(format!(
                "scheme '{scheme}' not allowed; only http and https are supported"
            )));
        }
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(malformed("URL has no host".to_string()));
    }
    Ok(url)
}

/// Fetch `target` and keep the first `max_chars` characters of its body.
///
/// Only as many bytes as can hold `max_chars` characters are read; the rest of
/// the response is never pulled off the socket.
pub async fn fetch_text(
    transport: &dyn Transport,
    target: &str,
    max_chars: usize,
) -> Result<TextContent, FetchError> {
    let url = parse_target(target)?;
    let body = transport.get(&url, max_utf8_bytes(max_chars)).await?;
    Ok(TextContent::from_utf8_prefix(&body, max_chars))
}

/// Fetch `target` and decode it as an image no larger than `max_bytes`.
pub async fn fetch_image(
    transport: &dyn Transport,
    decoder: Arc<dyn ImageDecoder>,
    target: &str,
    max_bytes: usize,
) -> Result<ImageBitmap, FetchError> {
    let url = parse_target(target)?;
    let body = transport.get(&url, max_bytes.saturating_add(1)).await?;
    if body.len() > max_bytes {
        return Err(FetchError::DecodeFailure {
            url: url.to_string(),
            reason: format!("image exceeds {max_bytes} bytes"),
        });
    }

    // Decoding is CPU-bound; keep it off the async worker threads.
    let decoded = tokio::task::spawn_blocking(move || decoder.decode(&body))
        .await
        .map_err(|e| FetchError::WorkerAborted {
            reason: format!("image decoder: {e}"),
        })?;

    decoded.map_err(|reason| FetchError::DecodeFailure {
        url: url.to_string(),
        reason,
    })
}
