//! Core domain types for tdnet.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod error;
mod ids;
mod message;
mod phase;
mod text;

pub use error::FetchError;
pub use ids::TaskId;
pub use message::{BitmapSizeError, CompletionMessage, ImageBitmap, Payload, Target};
pub use phase::{TaskPhase, TransitionError};
pub use text::{TextContent, max_utf8_bytes};
