use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use coco::{
    DatasetConfig, DatasetError, SplitDirs,
    config::{
        JOBS_ENV, OUTPUT_DIR_ENV, TRAIN_IMAGES_ENV, TRAIN_MASKS_ENV, VALID_IMAGES_ENV,
        VALID_MASKS_ENV,
    },
};
use mask::{Pipeline, PipelineBuilder};

/// Convert segmentation masks into COCO-style image and annotation manifests
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build any of the four manifests that do not exist yet
    Build(DatasetArgs),
    /// Print the area and polygons derived from a single mask
    Inspect(InspectArgs),
    /// Print the JSON schemas of image and annotation records
    Schema,
}

/// Dataset locations; flags fall back to their environment variables
#[derive(Args, Debug, Default)]
pub struct DatasetArgs {
    /// TOML or JSON file with the dataset configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory of training images
    #[arg(long, env = TRAIN_IMAGES_ENV)]
    pub train_images: Option<PathBuf>,
    /// Directory of training masks
    #[arg(long, env = TRAIN_MASKS_ENV)]
    pub train_masks: Option<PathBuf>,
    /// Directory of validation images
    #[arg(long, env = VALID_IMAGES_ENV)]
    pub valid_images: Option<PathBuf>,
    /// Directory of validation masks
    #[arg(long, env = VALID_MASKS_ENV)]
    pub valid_masks: Option<PathBuf>,
    /// Where the manifests are written
    #[arg(short, long, env = OUTPUT_DIR_ENV)]
    pub output_dir: Option<PathBuf>,
    /// Worker threads for per-file processing
    #[arg(short, long, env = JOBS_ENV)]
    pub jobs: Option<usize>,
}

impl DatasetArgs {
    /// Merge the config file (if any) with flags; flags win
    pub fn into_config(self) -> coco::Result<DatasetConfig> {
        let base = match &self.config {
            Some(path) => Some(DatasetConfig::from_file(path)?),
            None => None,
        };

        let mut config = match base {
            Some(mut config) => {
                override_path(&mut config.train.images, self.train_images);
                override_path(&mut config.train.masks, self.train_masks);
                override_path(&mut config.valid.images, self.valid_images);
                override_path(&mut config.valid.masks, self.valid_masks);
                config
            }
            None => {
                let train = SplitDirs {
                    images: require(self.train_images, TRAIN_IMAGES_ENV)?,
                    masks: require(self.train_masks, TRAIN_MASKS_ENV)?,
                };
                let valid = SplitDirs {
                    images: require(self.valid_images, VALID_IMAGES_ENV)?,
                    masks: require(self.valid_masks, VALID_MASKS_ENV)?,
                };
                DatasetConfig::new(train, valid)
            }
        };

        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(jobs) = self.jobs {
            config.jobs = Some(jobs);
        }
        config.validate()?;
        Ok(config)
    }
}

fn override_path(target: &mut PathBuf, value: Option<PathBuf>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn require(value: Option<PathBuf>, key: &str) -> coco::Result<PathBuf> {
    value.ok_or_else(|| DatasetError::ConfigurationMissing { key: key.to_string() })
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Mask image to analyze
    pub mask: PathBuf,
    /// Binarize at this level instead of Otsu's
    #[arg(long)]
    pub threshold: Option<u8>,
    /// Skip hole contours
    #[arg(long)]
    pub outer_only: bool,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl InspectArgs {
    pub fn pipeline(&self) -> Pipeline {
        let mut builder = PipelineBuilder::new();
        if let Some(threshold) = self.threshold {
            builder = builder.with_fixed_threshold(threshold);
        }
        if self.outer_only {
            builder = builder.outer_contours_only();
        }
        builder.build()
    }
}
