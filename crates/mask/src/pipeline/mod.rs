pub mod builder;

use std::path::Path;

use image::DynamicImage;
use crate::{
    error::Result,
    types::MaskGeometry,
    traits::{AreaEstimator, Binarizer, MaskAnalyzer, PolygonExtractor},
};

/// Mask processing pipeline: one binarization feeding both area and polygons
pub struct Pipeline {
    binarizer: Box<dyn Binarizer>,
    area_estimator: Box<dyn AreaEstimator>,
    polygon_extractor: Box<dyn PolygonExtractor>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Create a new pipeline with the given components
    pub fn new(
        binarizer: Box<dyn Binarizer>,
        area_estimator: Box<dyn AreaEstimator>,
        polygon_extractor: Box<dyn PolygonExtractor>,
    ) -> Self {
        Self {
            binarizer,
            area_estimator,
            polygon_extractor,
        }
    }

    /// Process a decoded mask image
    pub fn process(&self, image: &DynamicImage) -> Result<MaskGeometry> {
        // Step 1: Binarize once; both measurements must see the same pixels
        let binary_image = self.binarizer.binarize_image(image)?;

        // Step 2: Count foreground
        let area = self.area_estimator.estimate_area(&binary_image)?;

        // Step 3: Trace boundaries
        let polygons = self.polygon_extractor.extract_polygons(&binary_image)?;

        Ok(MaskGeometry {
            width: binary_image.width(),
            height: binary_image.height(),
            area,
            polygons,
        })
    }

    /// Load a mask from disk and process it
    pub fn process_path<P: AsRef<Path>>(&self, path: P) -> Result<MaskGeometry> {
        let path = path.as_ref();
        let image = crate::io::load_mask(path)?;
        let geometry = self.process(&image)?;
        tracing::debug!(
            path = %path.display(),
            area = geometry.area,
            polygons = geometry.polygons.len(),
            "processed mask"
        );
        Ok(geometry)
    }
}

impl MaskAnalyzer for Pipeline {
    fn analyze(&self, image: &DynamicImage) -> Result<MaskGeometry> {
        self.process(image)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        builder::PipelineBuilder::new().build()
    }
}
