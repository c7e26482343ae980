use std::ffi::OsString;
use std::path::{Path, PathBuf};

use mask::MaskError;
use thiserror::Error;

use crate::manifest::Split;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Missing configuration value '{key}'")]
    ConfigurationMissing { key: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidSetting { key: String, message: String },

    #[error(
        "{split} split: images and masks directories do not match \
         (no mask for {missing_masks:?}, no image for {missing_images:?})"
    )]
    DirectoryMismatch {
        split: Split,
        missing_masks: Vec<String>,
        missing_images: Vec<String>,
    },

    #[error("Failed to decode image {}: {source}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Non UTF-8 file name {name:?} in {}", .dir.display())]
    NonUtf8FileName { dir: PathBuf, name: OsString },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error("Unsupported config format. Please use .toml or .json files")]
    UnsupportedConfigFormat,

    #[error(transparent)]
    Mask(#[from] MaskError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl DatasetError {
    /// Attach a path to an IO error, for use with `map_err`
    pub fn io(path: impl AsRef<Path>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        move |source| Self::Io { path, source }
    }

    /// Attach a path to a mask processing error; decode failures keep their own kind
    pub fn from_mask(path: impl AsRef<Path>) -> impl FnOnce(MaskError) -> Self {
        let path = path.as_ref().to_path_buf();
        move |err| match err {
            MaskError::ImageLoad(source) => Self::ImageDecode { path, source },
            MaskError::Io(source) => Self::Io { path, source },
            other => Self::Mask(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, DatasetError>;
