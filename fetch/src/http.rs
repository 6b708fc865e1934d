//! HTTP transport.
//!
//! [`Transport`] is the seam between fetch operations and the network. The
//! production implementation wraps a `reqwest` client configured with the
//! connect and read timeouts; tests substitute in-memory transports.
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::future::{BoxFuture, FutureExt};
use reqwest::redirect::Policy;
use tdnet_types::FetchError;
use thiserror::Error;
use url::Url;

use crate::resolved::ResolvedConfig;

/// Issues a GET and returns at most `max_bytes` of the response body.
///
/// Implementations own the connection for the duration of the call and
/// release it on every exit path. Bytes past `max_bytes` are never read.
pub trait Transport: Send + Sync {
    fn get<'a>(&'a self, url: &'a Url, max_bytes: usize)
    -> BoxFuture<'a, Result<Vec<u8>, FetchError>>;
}

#[derive(Debug, Error)]
#[error("failed to build HTTP client: {0}")]
pub struct ClientBuildError(#[from] reqwest::Error);

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    read_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ResolvedConfig) -> Result<Self, ClientBuildError> {
        let mut builder = reqwest::Client::builder()
            .redirect(Policy::limited(5))
            .user_agent(&config.user_agent)
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout);

        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            read_timeout: config.read_timeout,
        })
    }

    async fn fetch(&self, url: &Url, max_bytes: usize) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, &e, self.read_timeout))?;

        let status = response.status();
        tracing::info!(%url, status = status.as_u16(), "response received");
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Dropping the stream on any return closes the connection.
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while body.len() < max_bytes {
            let Some(chunk) = stream.next().await else {
                break;
            };
            let chunk = chunk.map_err(|e| classify_error(url, &e, self.read_timeout))?;
            let room = max_bytes - body.len();
            body.extend_from_slice(&chunk[..chunk.len().min(room)]);
        }

        tracing::debug!(%url, bytes = body.len(), "body read");
        Ok(body)
    }
}

impl Transport for HttpTransport {
    fn get<'a>(
        &'a self,
        url: &'a Url,
        max_bytes: usize,
    ) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
        self.fetch(url, max_bytes).boxed()
    }
}

/// Map a client error onto the fetch taxonomy.
///
/// Connect errors win over timeouts so that an expired dial is reported as a
/// connect failure rather than a read stall.
fn classify_error(url: &Url, err: &reqwest::Error, read_timeout: Duration) -> FetchError {
    if err.is_connect() {
        return FetchError::ConnectFailure {
            url: url.to_string(),
            reason: error_chain(err),
        };
    }
    if err.is_timeout() {
        return FetchError::ReadTimeout {
            url: url.to_string(),
            timeout_ms: read_timeout.as_millis() as u64,
        };
    }
    FetchError::ReadFailure {
        url: url.to_string(),
        reason: error_chain(err),
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::error_chain;

    #[derive(Debug)]
    struct Layer(&'static str, Option<Box<Layer>>);

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl std::error::Error for Layer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            self.1.as_deref().map(|l| l as _)
        }
    }

    #[test]
    fn error_chain_joins_sources() {
        let err = Layer(
            "error sending request",
            Some(Box::new(Layer("connection refused", None))),
        );
        assert_eq!(error_chain(&err), "error sending request: connection refused");
    }
}
