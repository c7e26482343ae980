use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use tempfile::NamedTempFile;

use crate::{
    error::{DatasetError, Result},
    records::{AnnotationRecord, ImageRecord},
};

/// Dataset partition
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Split {
    Train,
    Valid,
}

/// The two JSON documents written per split
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ManifestKind {
    Images,
    Annotations,
}

/// Fixed output file name, e.g. `train_images.json`
pub fn manifest_file_name(split: Split, kind: ManifestKind) -> String {
    format!("{split}_{kind}.json")
}

/// Absolute locations of the four manifests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetPaths {
    pub train_images: PathBuf,
    pub train_annotations: PathBuf,
    pub valid_images: PathBuf,
    pub valid_annotations: PathBuf,
}

impl DatasetPaths {
    /// Resolve the four manifest paths inside `output_dir`, made absolute
    pub fn in_dir(output_dir: &Path) -> Result<Self> {
        let dir = std::path::absolute(output_dir).map_err(DatasetError::io(output_dir))?;
        let path = |split, kind| dir.join(manifest_file_name(split, kind));
        Ok(Self {
            train_images: path(Split::Train, ManifestKind::Images),
            train_annotations: path(Split::Train, ManifestKind::Annotations),
            valid_images: path(Split::Valid, ManifestKind::Images),
            valid_annotations: path(Split::Valid, ManifestKind::Annotations),
        })
    }

    pub fn get(&self, split: Split, kind: ManifestKind) -> &Path {
        match (split, kind) {
            (Split::Train, ManifestKind::Images) => &self.train_images,
            (Split::Train, ManifestKind::Annotations) => &self.train_annotations,
            (Split::Valid, ManifestKind::Images) => &self.valid_images,
            (Split::Valid, ManifestKind::Annotations) => &self.valid_annotations,
        }
    }

    /// All four paths in `(train_images, train_annotations, valid_images, valid_annotations)` order
    pub fn to_array(&self) -> [&Path; 4] {
        [
            &self.train_images,
            &self.train_annotations,
            &self.valid_images,
            &self.valid_annotations,
        ]
    }
}

/// One built manifest, held fully in memory until written
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Manifest {
    Images(Vec<ImageRecord>),
    Annotations(Vec<AnnotationRecord>),
}

impl Manifest {
    pub fn kind(&self) -> ManifestKind {
        match self {
            Self::Images(_) => ManifestKind::Images,
            Self::Annotations(_) => ManifestKind::Annotations,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Images(records) => records.len(),
            Self::Annotations(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize as a bare JSON array in a single write.
    ///
    /// The document goes to a temporary file next to `path` and is renamed
    /// into place, so `path` either holds a complete manifest or does not exist.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(DatasetError::io(dir))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(DatasetError::io(dir))?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, self)?;
            writer.flush().map_err(DatasetError::io(path))?;
        }
        tmp.persist(path)
            .map_err(|e| DatasetError::Io { path: path.to_path_buf(), source: e.error })?;
        Ok(())
    }
}
