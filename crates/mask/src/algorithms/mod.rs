pub mod preprocessing;
pub mod extraction;
pub mod measurement;

pub use preprocessing::*;
pub use extraction::*;
pub use measurement::*;

use image::DynamicImage;
use crate::{
    error::Result,
    types::MaskGeometry,
    traits::{AreaEstimator, Binarizer, MaskAnalyzer, PolygonExtractor},
};

/// Statically dispatched analyzer: binarize once, then measure and trace
#[derive(Debug, Clone, Default)]
pub struct StandardMaskAnalyzer<B, A, P>
where
    B: Binarizer,
    A: AreaEstimator,
    P: PolygonExtractor,
{
    pub binarizer: B,
    pub area_estimator: A,
    pub polygon_extractor: P,
}

impl<B, A, P> StandardMaskAnalyzer<B, A, P>
where
    B: Binarizer,
    A: AreaEstimator,
    P: PolygonExtractor,
{
    pub fn new(binarizer: B, area_estimator: A, polygon_extractor: P) -> Self {
        Self {
            binarizer,
            area_estimator,
            polygon_extractor,
        }
    }
}

impl<B, A, P> MaskAnalyzer for StandardMaskAnalyzer<B, A, P>
where
    B: Binarizer,
    A: AreaEstimator,
    P: PolygonExtractor,
{
    fn analyze(&self, image: &DynamicImage) -> Result<MaskGeometry> {
        let binary_image = self.binarizer.binarize_image(image)?;
        let area = self.area_estimator.estimate_area(&binary_image)?;
        let polygons = self.polygon_extractor.extract_polygons(&binary_image)?;

        Ok(MaskGeometry {
            width: binary_image.width(),
            height: binary_image.height(),
            area,
            polygons,
        })
    }
}
