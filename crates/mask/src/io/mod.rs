use std::fs;
use std::path::Path;

use image::DynamicImage;
use crate::error::Result;

/// Decode a mask image from disk
///
/// The format is guessed from the content. Reading the file and decoding it
/// fail separately, as `MaskError::Io` and `MaskError::ImageLoad`.
pub fn load_mask<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let bytes = fs::read(path)?;
    load_mask_from_bytes(&bytes)
}

/// Decode a mask image from memory
pub fn load_mask_from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}
