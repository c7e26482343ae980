use image::{DynamicImage, GrayImage, Luma};
use crate::{error::Result, traits::Binarizer};

/// Pixel value marking foreground in a binarized mask
pub const FOREGROUND: u8 = 255;
/// Pixel value marking background in a binarized mask
pub const BACKGROUND: u8 = 0;

/// Luma-weighted reduction of any color type to 8-bit grayscale
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}

/// Pixels strictly above `level` become foreground, everything else background
pub fn binarize_above(gray: &GrayImage, level: u8) -> GrayImage {
    imageproc::map::map_colors(gray, |Luma([value])| {
        if value > level {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}

/// Global automatic threshold picked by Otsu's method
///
/// Assumes a bimodal histogram. Masks with more than two intensity
/// populations are split at whatever level maximizes between-class
/// variance, with no diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct OtsuBinarizer;

impl OtsuBinarizer {
    /// The level that would be used for `gray`
    pub fn level(&self, gray: &GrayImage) -> u8 {
        imageproc::contrast::otsu_level(gray)
    }
}

impl Binarizer for OtsuBinarizer {
    fn binarize(&self, gray: &GrayImage) -> Result<GrayImage> {
        let level = self.level(gray);
        tracing::trace!(level, "otsu threshold");
        Ok(binarize_above(gray, level))
    }
}

/// Simple fixed-level binarizer
#[derive(Debug, Clone, Copy)]
pub struct FixedThresholdBinarizer {
    pub threshold: u8,
}

impl Default for FixedThresholdBinarizer {
    fn default() -> Self {
        Self { threshold: 127 }
    }
}

impl Binarizer for FixedThresholdBinarizer {
    fn binarize(&self, gray: &GrayImage) -> Result<GrayImage> {
        Ok(binarize_above(gray, self.threshold))
    }
}
