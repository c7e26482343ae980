//! # COCO manifests from segmentation masks
//!
//! Turns paired image/mask directories into COCO-style JSON manifests: one
//! images array and one annotations array per split, written as
//! `train_images.json`, `train_annotations.json`, `valid_images.json` and
//! `valid_annotations.json`.
//!
//! A manifest that already exists on disk is never rebuilt.
//!
//! ```rust,no_run
//! use coco::{DatasetAssembler, DatasetConfig};
//!
//! let config = DatasetConfig::from_env()?;
//! let report = DatasetAssembler::new(config)?.assemble()?;
//! println!("{}", report.paths.train_annotations.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assembler;
pub mod config;
pub mod error;
pub mod manifest;
pub mod records;
pub mod split;

pub use assembler::{AssembleReport, DatasetAssembler, ManifestOutcome, ManifestStatus};
pub use config::{DatasetConfig, SplitDirs};
pub use error::{DatasetError, Result};
pub use manifest::{DatasetPaths, Manifest, ManifestKind, Split, manifest_file_name};
pub use records::{AnnotationRecord, ImageRecord};
pub use split::SplitIndex;

pub use mask::{MaskGeometry, Polygon};

/// Build whatever manifests are missing and return the four output paths
pub fn build_dataset(config: DatasetConfig) -> Result<DatasetPaths> {
    let report = DatasetAssembler::new(config)?.assemble()?;
    Ok(report.paths)
}
