use image::{DynamicImage, GrayImage};
use crate::{
    error::Result,
    types::{MaskGeometry, Polygon},
};

/// Trait for turning a mask into a foreground/background image
pub trait Binarizer: Send + Sync {
    /// Binarize a single-channel image; output pixels are 0 or 255
    fn binarize(&self, gray: &GrayImage) -> Result<GrayImage>;

    /// Convert an arbitrary mask image to luma, then binarize it
    fn binarize_image(&self, image: &DynamicImage) -> Result<GrayImage> {
        self.binarize(&crate::algorithms::to_grayscale(image))
    }
}

/// Trait for measuring the foreground area of a binarized mask
pub trait AreaEstimator: Send + Sync {
    fn estimate_area(&self, binary_image: &GrayImage) -> Result<u64>;
}

/// Trait for tracing boundary polygons out of a binarized mask
pub trait PolygonExtractor: Send + Sync {
    fn extract_polygons(&self, binary_image: &GrayImage) -> Result<Vec<Polygon>>;
}

/// Main trait for deriving area and polygons from a mask image
pub trait MaskAnalyzer: Send + Sync {
    fn analyze(&self, image: &DynamicImage) -> Result<MaskGeometry>;
}
