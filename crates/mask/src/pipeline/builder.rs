use crate::{
    pipeline::Pipeline,
    traits::{AreaEstimator, Binarizer, PolygonExtractor},
    algorithms::{
        BorderFollowingExtractor,
        FixedThresholdBinarizer,
        OtsuBinarizer,
        PixelCountAreaEstimator,
    },
};

/// Builder for creating processing pipelines with a fluent API
pub struct PipelineBuilder {
    binarizer: Option<Box<dyn Binarizer>>,
    area_estimator: Option<Box<dyn AreaEstimator>>,
    polygon_extractor: Option<Box<dyn PolygonExtractor>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            binarizer: None,
            area_estimator: None,
            polygon_extractor: None,
        }
    }

    /// Set the binarizer (replaces any existing one)
    pub fn set_binarizer<B>(mut self, binarizer: B) -> Self
    where
        B: Binarizer + 'static,
    {
        self.binarizer = Some(Box::new(binarizer));
        self
    }

    /// Set the area estimator (replaces any existing one)
    pub fn set_area_estimator<A>(mut self, estimator: A) -> Self
    where
        A: AreaEstimator + 'static,
    {
        self.area_estimator = Some(Box::new(estimator));
        self
    }

    /// Set the polygon extractor (replaces any existing one)
    pub fn set_polygon_extractor<P>(mut self, extractor: P) -> Self
    where
        P: PolygonExtractor + 'static,
    {
        self.polygon_extractor = Some(Box::new(extractor));
        self
    }

    /// Binarize at a fixed level instead of Otsu's
    pub fn with_fixed_threshold(self, threshold: u8) -> Self {
        self.set_binarizer(FixedThresholdBinarizer { threshold })
    }

    /// Drop hole borders from the traced polygons
    pub fn outer_contours_only(self) -> Self {
        self.set_polygon_extractor(BorderFollowingExtractor::outer_only())
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> Pipeline {
        let binarizer = self.binarizer
            .unwrap_or_else(|| Box::new(OtsuBinarizer));

        let area_estimator = self.area_estimator
            .unwrap_or_else(|| Box::new(PixelCountAreaEstimator));

        let polygon_extractor = self.polygon_extractor
            .unwrap_or_else(|| Box::new(BorderFollowingExtractor::default()));

        Pipeline::new(binarizer, area_estimator, polygon_extractor)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
