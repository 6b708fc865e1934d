//! Payloads and the completion message handed from a worker to the consumer.

use std::fmt;

use thiserror::Error;

use crate::{FetchError, TaskId, TextContent};

/// The consumer-side display a task feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Text,
    Image,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Text, Target::Image];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Target::Text => "text",
            Target::Image => "image",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bitmap {width}x{height} needs {expected} RGBA bytes, got {actual}")]
pub struct BitmapSizeError {
    pub width: u32,
    pub height: u32,
    pub expected: usize,
    pub actual: usize,
}

/// A decoded image as tightly packed RGBA8 rows.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageBitmap {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BitmapSizeError> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if pixels.len() != expected {
            return Err(BitmapSizeError {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

// Pixel buffers are large; log the shape only.
impl fmt::Debug for ImageBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(TextContent),
    Image(ImageBitmap),
}

impl Payload {
    #[must_use]
    pub fn target(&self) -> Target {
        match self {
            Payload::Text(_) => Target::Text,
            Payload::Image(_) => Target::Image,
        }
    }
}

/// Outcome of one task, produced once by its worker and consumed once by the consumer.
///
/// Deliberately not `Clone`: draining a message moves it out of the queue and
/// nothing else can observe it afterwards.
#[derive(Debug)]
pub struct CompletionMessage {
    task: TaskId,
    target: Target,
    outcome: Result<Payload, FetchError>,
}

impl CompletionMessage {
    #[must_use]
    pub fn new(task: TaskId, target: Target, outcome: Result<Payload, FetchError>) -> Self {
        Self {
            task,
            target,
            outcome,
        }
    }

    #[must_use]
    pub fn task(&self) -> TaskId {
        self.task
    }

    #[must_use]
    pub fn target(&self) -> Target {
        self.target
    }

    #[must_use]
    pub fn payload(&self) -> Option<&Payload> {
        self.outcome.as_ref().ok()
    }

    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        self.outcome.as_ref().err()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    #[must_use]
    pub fn into_outcome(self) -> Result<Payload, FetchError> {
        self.outcome
    }
}
