//! Image decoding.

use tdnet_types::ImageBitmap;

/// Turns encoded image bytes into a displayable bitmap.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<ImageBitmap, String>;
}

/// Decodes PNG, JPEG and GIF through the `image` crate, always yielding RGBA8.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDecoder;

impl ImageDecoder for StandardDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<ImageBitmap, String> {
        let decoded = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        ImageBitmap::from_rgba(width, height, rgba.into_raw()).map_err(|e| e.to_string())
    }
}
