use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    config::SplitDirs,
    error::{DatasetError, Result},
    manifest::Split,
};

/// List the regular files of `dir` by name, sorted.
///
/// Hidden entries (leading `.`) and subdirectories are ignored.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(DatasetError::io(dir))? {
        let entry = entry.map_err(DatasetError::io(dir))?;
        let file_type = entry.file_type().map_err(DatasetError::io(entry.path()))?;
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().into_string().map_err(|name| DatasetError::NonUtf8FileName {
            dir: dir.to_path_buf(),
            name,
        })?;
        if name.starts_with('.') {
            tracing::debug!("Ignoring hidden file {}", name);
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// The files of one split and the ids assigned to them.
///
/// Built once per split. Image ids come from an explicit `file_name -> id`
/// map instead of positional searches.
#[derive(Debug, Clone)]
pub struct SplitIndex {
    split: Split,
    images_dir: PathBuf,
    masks_dir: PathBuf,
    image_names: Vec<String>,
    mask_names: Vec<String>,
    image_ids: HashMap<String, u64>,
}

impl SplitIndex {
    /// List both directories of a split and pair their files
    pub fn scan(split: Split, dirs: &SplitDirs) -> Result<Self> {
        let image_names = list_files(&dirs.images)?;
        let mask_names = list_files(&dirs.masks)?;
        tracing::debug!(
            "{} split: {} images, {} masks",
            split,
            image_names.len(),
            mask_names.len()
        );
        Self::from_listings(split, dirs, image_names, mask_names)
    }

    /// Pair already-listed file names; both name sets must match exactly
    pub fn from_listings(
        split: Split,
        dirs: &SplitDirs,
        image_names: Vec<String>,
        mask_names: Vec<String>,
    ) -> Result<Self> {
        let images: BTreeSet<&str> = image_names.iter().map(String::as_str).collect();
        let masks: BTreeSet<&str> = mask_names.iter().map(String::as_str).collect();

        if images != masks {
            return Err(DatasetError::DirectoryMismatch {
                split,
                missing_masks: images.difference(&masks).map(|s| s.to_string()).collect(),
                missing_images: masks.difference(&images).map(|s| s.to_string()).collect(),
            });
        }

        let image_ids = image_names
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id as u64))
            .collect();

        Ok(Self {
            split,
            images_dir: dirs.images.clone(),
            masks_dir: dirs.masks.clone(),
            image_names,
            mask_names,
            image_ids,
        })
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn len(&self) -> usize {
        self.image_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image_names.is_empty()
    }

    /// `(id, file_name)` of each image in listing order
    pub fn images(&self) -> impl Iterator<Item = (u64, &str)> + '_ {
        self.image_names
            .iter()
            .enumerate()
            .map(|(id, name)| (id as u64, name.as_str()))
    }

    /// `(annotation_id, file_name)` of each mask in listing order
    pub fn masks(&self) -> impl Iterator<Item = (u64, &str)> + '_ {
        self.mask_names
            .iter()
            .enumerate()
            .map(|(id, name)| (id as u64, name.as_str()))
    }

    /// Id of the image with this file name
    pub fn image_id(&self, file_name: &str) -> Option<u64> {
        self.image_ids.get(file_name).copied()
    }

    pub fn image_path(&self, file_name: &str) -> PathBuf {
        self.images_dir.join(file_name)
    }

    pub fn mask_path(&self, file_name: &str) -> PathBuf {
        self.masks_dir.join(file_name)
    }
}
