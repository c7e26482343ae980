use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{DatasetError, Result},
    manifest::Split,
};

pub const TRAIN_IMAGES_ENV: &str = "TRAIN_IMAGES";
pub const TRAIN_MASKS_ENV: &str = "TRAIN_MASKS";
pub const VALID_IMAGES_ENV: &str = "VALID_IMAGES";
pub const VALID_MASKS_ENV: &str = "VALID_MASKS";
pub const OUTPUT_DIR_ENV: &str = "MASK2COCO_OUTPUT_DIR";
pub const JOBS_ENV: &str = "MASK2COCO_JOBS";

/// Manifests land here unless configured otherwise
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Source directories of one split; file names pair up 1:1
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SplitDirs {
    pub images: PathBuf,
    pub masks: PathBuf,
}

/// Everything the dataset assembler needs, passed in explicitly
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DatasetConfig {
    pub train: SplitDirs,
    pub valid: SplitDirs,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Worker threads for per-file processing; rayon's default when unset
    #[serde(default)]
    pub jobs: Option<usize>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl DatasetConfig {
    pub fn new(train: SplitDirs, valid: SplitDirs) -> Self {
        Self {
            train,
            valid,
            output_dir: default_output_dir(),
            jobs: None,
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn split_dirs(&self, split: Split) -> &SplitDirs {
        match split {
            Split::Train => &self.train,
            Split::Valid => &self.valid,
        }
    }

    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            value(key)
                .map(PathBuf::from)
                .ok_or_else(|| DatasetError::ConfigurationMissing { key: key.to_string() })
        };

        let train = SplitDirs {
            images: require(TRAIN_IMAGES_ENV)?,
            masks: require(TRAIN_MASKS_ENV)?,
        };
        let valid = SplitDirs {
            images: require(VALID_IMAGES_ENV)?,
            masks: require(VALID_MASKS_ENV)?,
        };

        let mut config = Self::new(train, valid);
        if let Some(output_dir) = value(OUTPUT_DIR_ENV) {
            config.output_dir = PathBuf::from(output_dir);
        }
        if let Some(jobs) = value(JOBS_ENV) {
            config.jobs = Some(parse_jobs(&jobs)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(DatasetError::io(path))?;
        Self::from_toml(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: DatasetConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(DatasetError::io(path))?;
        Self::from_json(&content)
    }

    /// Load configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        let config: DatasetConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(DatasetError::UnsupportedConfigFormat),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jobs == Some(0) {
            return Err(DatasetError::InvalidSetting {
                key: "jobs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_jobs(raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|e| DatasetError::InvalidSetting {
            key: JOBS_ENV.to_string(),
            message: e.to_string(),
        })
}
