//! # Mask Geometry Library
//!
//! Derives the foreground area and the boundary polygons of a binary
//! segmentation mask. A mask is binarized once (luma + Otsu threshold), then
//! the same binarized raster is handed to an area estimator and a polygon
//! extractor.
//!
//! ## Core Features
//!
//! - **Trait-based Architecture**: swap the binarizer, area estimator or polygon extractor
//! - **Pipeline System**: boxed components assembled through a builder
//! - **Hole Contours**: border following retrieves outer and hole borders alike
//! - **No Approximation**: every border pixel is kept as a polygon point
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mask::Pipeline;
//!
//! let pipeline = Pipeline::builder().build();
//! let geometry = pipeline.process_path("mask.png")?;
//! println!("area = {}, polygons = {}", geometry.area, geometry.polygons.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Pipeline
//!
//! ```rust,no_run
//! use mask::{Pipeline, algorithms::*};
//!
//! let pipeline = Pipeline::builder()
//!     .set_binarizer(FixedThresholdBinarizer { threshold: 100 })
//!     .set_polygon_extractor(BorderFollowingExtractor::outer_only())
//!     .build();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod io;

// Re-exports for convenience
pub use error::{MaskError, Result};
pub use types::{MaskGeometry, Polygon};
pub use traits::*;
pub use algorithms::*;
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use io::*;

/// Otsu binarization, pixel counting and full border following
pub type OtsuMaskAnalyzer = StandardMaskAnalyzer<
    OtsuBinarizer,
    PixelCountAreaEstimator,
    BorderFollowingExtractor,
>;
