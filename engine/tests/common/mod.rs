//! Shared fixtures: scripted collaborators and a consumer-side wait helper.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, FutureExt};
use tdnet_engine::{App, Collaborators, FetchError, FixedConnectivity, ImageBitmap, ResolvedConfig};
use tdnet_fetch::{ImageDecoder, Transport};
use tokio::runtime::{Builder, Runtime};
use url::Url;

pub const TEXT_URL: &str = "http://weather.test/data/2.5/weather?q=Rome";
pub const IMAGE_URL: &str = "http://weather.test/img/w/10d.png";

pub fn runtime() -> Runtime {
    Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap()
}

pub fn config() -> ResolvedConfig {
    ResolvedConfig {
        text_url: TEXT_URL.to_string(),
        image_url: IMAGE_URL.to_string(),
        ..ResolvedConfig::default()
    }
}

/// Answers each URL with a canned outcome and counts every call.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: HashMap<String, Result<Vec<u8>, FetchError>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, outcome: Result<Vec<u8>, FetchError>) -> Self {
        self.responses.insert(url.to_string(), outcome);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for ScriptedTransport {
    fn get<'a>(
        &'a self,
        url: &'a Url,
        max_bytes: usize,
    ) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        async move {
            // Give the other worker a chance to interleave.
            tokio::task::yield_now().await;
            match self.responses.get(url.as_str()) {
                Some(Ok(body)) => Ok(body[..body.len().min(max_bytes)].to_vec()),
                Some(Err(e)) => Err(e.clone()),
                None => Err(FetchError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
        .boxed()
    }
}

/// Decodes any body into a 1-pixel-high strip as wide as the body.
pub struct StripDecoder;

impl ImageDecoder for StripDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<ImageBitmap, String> {
        if bytes.is_empty() {
            return Err("empty image".to_string());
        }
        let width = u32::try_from(bytes.len()).map_err(|e| e.to_string())?;
        ImageBitmap::from_rgba(width, 1, vec![0xff; bytes.len() * 4]).map_err(|e| e.to_string())
    }
}

pub fn app(
    runtime: &Runtime,
    transport: Arc<ScriptedTransport>,
    connectivity: Arc<FixedConnectivity>,
) -> App {
    App::new(
        config(),
        runtime.handle().clone(),
        Collaborators {
            transport,
            decoder: Arc::new(StripDecoder),
            connectivity,
        },
    )
}

/// Drain deliveries on the calling thread until `done` holds or five seconds pass.
pub fn drain_until(app: &mut App, mut done: impl FnMut(&App) -> bool) -> usize {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut applied = 0;
    loop {
        applied += app.process_deliveries();
        if done(app) {
            return applied;
        }
        assert!(Instant::now() < deadline, "deliveries did not settle in time");
        thread::sleep(Duration::from_millis(1));
    }
}
