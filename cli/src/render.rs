//! Plain-text rendering of the consumer state.

use tdnet_engine::{ConsumerState, ImageBitmap};

pub const HELP: &str = "commands: text (t), image (i), help (h), quit (q)";

pub fn describe_image(image: Option<&ImageBitmap>) -> String {
    match image {
        Some(image) => format!(
            "{}x{} RGBA, {} bytes",
            image.width(),
            image.height(),
            image.pixels().len()
        ),
        None => "(none)".to_string(),
    }
}

pub fn describe_text(text: &str) -> &str {
    if text.is_empty() { "(none)" } else { text }
}

pub fn render(state: &ConsumerState) -> String {
    format!(
        "text:  {}\nimage: {}",
        describe_text(state.text()),
        describe_image(state.image())
    )
}
