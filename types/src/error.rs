//! Failure taxonomy for fetch tasks.

use thiserror::Error;

/// Why a fetch was declined or did not produce a payload.
///
/// Every variant except [`FetchError::NetworkUnavailable`] travels to the
/// consumer inside a completion message. `NetworkUnavailable` is returned
/// synchronously by the trigger because no task was ever started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("no network connection available")]
    NetworkUnavailable,

    #[error("malformed target `{target}`: {reason}")]
    MalformedTarget { target: String, reason: String },

    #[error("failed to connect to {url}: {reason}")]
    ConnectFailure { url: String, reason: String },

    #[error("no data from {url} within {timeout_ms} ms")]
    ReadTimeout { url: String, timeout_ms: u64 },

    #[error("reading from {url} failed: {reason}")]
    ReadFailure { url: String, reason: String },

    #[error("{url} answered with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("response from {url} is not a decodable image: {reason}")]
    DecodeFailure { url: String, reason: String },

    #[error("worker stopped before producing a result: {reason}")]
    WorkerAborted { reason: String },
}

impl FetchError {
    /// Stable snake_case identifier, used as a structured log field.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            FetchError::NetworkUnavailable => "network_unavailable",
            FetchError::MalformedTarget { .. } => "malformed_target",
            FetchError::ConnectFailure { .. } => "connect_failure",
            FetchError::ReadTimeout { .. } => "read_timeout",
            FetchError::ReadFailure { .. } => "read_failure",
            FetchError::HttpStatus { .. } => "http_status",
            FetchError::DecodeFailure { .. } => "decode_failure",
            FetchError::WorkerAborted { .. } => "worker_aborted",
        }
    }

    /// True for failures of the network call itself (dial, stall, broken stream).
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            FetchError::ConnectFailure { .. }
                | FetchError::ReadTimeout { .. }
                | FetchError::ReadFailure { .. }
        )
    }
}
