use std::fs;
use std::path::PathBuf;

use mask::Pipeline;
use rayon::prelude::*;
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::{
    config::DatasetConfig,
    error::{DatasetError, Result},
    manifest::{DatasetPaths, Manifest, ManifestKind, Split},
    records::{AnnotationRecord, ImageRecord},
    split::SplitIndex,
};

/// What happened to one manifest during [`DatasetAssembler::assemble`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ManifestStatus {
    Built { records: usize },
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestOutcome {
    pub split: Split,
    pub kind: ManifestKind,
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: ManifestStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssembleReport {
    pub paths: DatasetPaths,
    pub outcomes: Vec<ManifestOutcome>,
}

impl AssembleReport {
    pub fn built(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ManifestStatus::Built { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.built()
    }
}

/// Builds the missing manifests of every split
pub struct DatasetAssembler {
    config: DatasetConfig,
    pipeline: Pipeline,
    pool: rayon::ThreadPool,
}

impl DatasetAssembler {
    /// Assembler using the default mask pipeline (Otsu + border following)
    pub fn new(config: DatasetConfig) -> Result<Self> {
        Self::with_pipeline(config, Pipeline::default())
    }

    pub fn with_pipeline(config: DatasetConfig, pipeline: Pipeline) -> Result<Self> {
        config.validate()?;

        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(jobs) = config.jobs {
            builder = builder.num_threads(jobs);
        }
        let pool = builder.build()?;

        Ok(Self {
            config,
            pipeline,
            pool,
        })
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Absolute paths of the four manifests, whether or not they exist yet
    pub fn output_paths(&self) -> Result<DatasetPaths> {
        DatasetPaths::in_dir(&self.config.output_dir)
    }

    /// Build every manifest whose file is absent; existing files are left untouched
    pub fn assemble(&self) -> Result<AssembleReport> {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(DatasetError::io(output_dir))?;

        let paths = self.output_paths()?;
        let mut outcomes = Vec::new();

        for split in Split::iter() {
            let mut pending = Vec::new();
            for kind in ManifestKind::iter() {
                let path = paths.get(split, kind);
                if path.exists() {
                    info!("{} already exists, skipping", path.display());
                    outcomes.push(ManifestOutcome {
                        split,
                        kind,
                        path: path.to_path_buf(),
                        status: ManifestStatus::Skipped,
                    });
                } else {
                    pending.push(kind);
                }
            }
            if pending.is_empty() {
                continue;
            }

            let index = SplitIndex::scan(split, self.config.split_dirs(split))?;
            for kind in pending {
                let path = paths.get(split, kind);
                info!("Building {} {} manifest", split, kind);
                let manifest = self.build(&index, kind)?;
                manifest.write_to(path)?;
                info!("Wrote {} records to {}", manifest.len(), path.display());

                outcomes.push(ManifestOutcome {
                    split,
                    kind,
                    path: path.to_path_buf(),
                    status: ManifestStatus::Built { records: manifest.len() },
                });
            }
        }

        Ok(AssembleReport { paths, outcomes })
    }

    /// Build one manifest in memory, regardless of what exists on disk
    pub fn build_manifest(&self, split: Split, kind: ManifestKind) -> Result<Manifest> {
        let index = SplitIndex::scan(split, self.config.split_dirs(split))?;
        self.build(&index, kind)
    }

    fn build(&self, index: &SplitIndex, kind: ManifestKind) -> Result<Manifest> {
        match kind {
            ManifestKind::Images => self.build_images(index).map(Manifest::Images),
            ManifestKind::Annotations => self.build_annotations(index).map(Manifest::Annotations),
        }
    }

    /// One image record per file, in listing order; every image is fully decoded
    pub fn build_images(&self, index: &SplitIndex) -> Result<Vec<ImageRecord>> {
        let entries: Vec<(u64, &str)> = index.images().collect();

        self.pool.install(|| {
            entries
                .par_iter()
                .map(|&(id, file_name)| -> Result<ImageRecord> {
                    let path = index.image_path(file_name);
                    debug!("{}", file_name);
                    let image = mask::load_mask(&path).map_err(DatasetError::from_mask(&path))?;
                    Ok(ImageRecord::new(id, image.width(), image.height(), file_name))
                })
                .collect()
        })
    }

    /// One annotation record per mask, in listing order
    pub fn build_annotations(&self, index: &SplitIndex) -> Result<Vec<AnnotationRecord>> {
        let entries: Vec<(u64, &str)> = index.masks().collect();

        self.pool.install(|| {
            entries
                .par_iter()
                .map(|&(id, file_name)| -> Result<AnnotationRecord> {
                    let image_id = index.image_id(file_name).ok_or_else(|| {
                        DatasetError::DirectoryMismatch {
                            split: index.split(),
                            missing_masks: Vec::new(),
                            missing_images: vec![file_name.to_string()],
                        }
                    })?;
                    let path = index.mask_path(file_name);
                    let geometry = self
                        .pipeline
                        .process_path(&path)
                        .map_err(DatasetError::from_mask(&path))?;
                    Ok(AnnotationRecord::from_geometry(id, image_id, geometry))
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SplitDirs;
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use std::path::Path;

    struct Fixture {
        _dir: tempfile::TempDir,
        config: DatasetConfig,
    }

    fn write_pair(dirs: &SplitDirs, name: &str, width: u32, height: u32, square: (u32, u32, u32)) {
        RgbImage::from_pixel(width, height, Rgb([90, 120, 30]))
            .save(dirs.images.join(name))
            .unwrap();

        let (x0, y0, side) = square;
        let mut mask = RgbImage::new(width, height);
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                mask.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        mask.save(dirs.masks.join(name)).unwrap();
    }

    fn split_dirs(root: &Path, split: &str) -> SplitDirs {
        let dirs = SplitDirs {
            images: root.join(split).join("images"),
            masks: root.join(split).join("masks"),
        };
        fs::create_dir_all(&dirs.images).unwrap();
        fs::create_dir_all(&dirs.masks).unwrap();
        dirs
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let train = split_dirs(dir.path(), "train");
        let valid = split_dirs(dir.path(), "valid");

        write_pair(&train, "a.png", 40, 30, (5, 5, 10));
        write_pair(&train, "b.png", 64, 48, (20, 10, 16));
        write_pair(&valid, "c.png", 32, 32, (0, 0, 8));

        let config = DatasetConfig::new(train, valid)
            .with_output_dir(dir.path().join("data"))
            .with_jobs(2);
        Fixture { _dir: dir, config }
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_end_to_end_two_files() {
        let fixture = fixture();
        let assembler = DatasetAssembler::new(fixture.config.clone()).unwrap();
        let report = assembler.assemble().unwrap();

        assert_eq!(report.built(), 4);
        assert_eq!(report.skipped(), 0);
        for path in report.paths.to_array() {
            assert!(path.is_absolute());
            assert!(path.exists());
        }

        let images = read_json(&report.paths.train_images);
        let images = images.as_array().unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0]["id"], 0);
        assert_eq!(images[0]["file_name"], "a.png");
        assert_eq!(images[0]["width"], 40);
        assert_eq!(images[0]["height"], 30);
        assert_eq!(images[1]["id"], 1);
        assert_eq!(images[1]["file_name"], "b.png");

        let annotations = read_json(&report.paths.train_annotations);
        let annotations = annotations.as_array().unwrap();
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0]["image_id"], 0);
        assert_eq!(annotations[1]["image_id"], 1);
        assert_eq!(annotations[0]["area"], 100);
        assert_eq!(annotations[1]["area"], 256);
        assert_eq!(annotations[0]["category_id"], 1);
        assert_eq!(annotations[0]["iscrowd"], 0);
        assert_eq!(annotations[0]["bbox"], serde_json::json!([0, 0, 0, 0]));
        assert_eq!(annotations[0]["segmentation"].as_array().unwrap().len(), 1);

        let valid = read_json(&report.paths.valid_annotations);
        assert_eq!(valid.as_array().unwrap().len(), 1);
        assert_eq!(valid[0]["area"], 64);
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let fixture = fixture();
        let assembler = DatasetAssembler::new(fixture.config.clone()).unwrap();
        let first = assembler.assemble().unwrap();
        let before: Vec<Vec<u8>> = first
            .paths
            .to_array()
            .iter()
            .map(|p| fs::read(p).unwrap())
            .collect();

        // Removing the sources proves the pipeline is not re-run
        fs::remove_dir_all(&fixture.config.train.masks).unwrap();

        let second = assembler.assemble().unwrap();
        assert_eq!(second.built(), 0);
        assert_eq!(second.skipped(), 4);
        assert_eq!(second.paths, first.paths);

        let after: Vec<Vec<u8>> = second
            .paths
            .to_array()
            .iter()
            .map(|p| fs::read(p).unwrap())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_only_missing_manifest_is_rebuilt() {
        let fixture = fixture();
        let assembler = DatasetAssembler::new(fixture.config.clone()).unwrap();
        let first = assembler.assemble().unwrap();

        fs::remove_file(&first.paths.valid_images).unwrap();
        let second = assembler.assemble().unwrap();

        assert_eq!(second.built(), 1);
        let rebuilt = second
            .outcomes
            .iter()
            .find(|o| matches!(o.status, ManifestStatus::Built { .. }))
            .unwrap();
        assert_eq!(rebuilt.split, Split::Valid);
        assert_eq!(rebuilt.kind, ManifestKind::Images);
        assert_eq!(rebuilt.status, ManifestStatus::Built { records: 1 });
    }

    #[test]
    fn test_mismatched_directories() {
        let fixture = fixture();
        fs::remove_file(fixture.config.train.masks.join("b.png")).unwrap();

        let assembler = DatasetAssembler::new(fixture.config.clone()).unwrap();
        let err = assembler.assemble().unwrap_err();
        match err {
            DatasetError::DirectoryMismatch { split, missing_masks, .. } => {
                assert_eq!(split, Split::Train);
                assert_eq!(missing_masks, vec!["b.png".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!assembler.output_paths().unwrap().train_images.exists());
    }

    #[test]
    fn test_undecodable_mask() {
        let fixture = fixture();
        fs::write(fixture.config.valid.masks.join("c.png"), b"garbage").unwrap();

        let assembler = DatasetAssembler::new(fixture.config.clone()).unwrap();
        let err = assembler
            .build_manifest(Split::Valid, ManifestKind::Annotations)
            .unwrap_err();
        assert!(matches!(err, DatasetError::ImageDecode { .. }));
    }

    #[test]
    fn test_truncated_image_is_a_decode_error() {
        let fixture = fixture();
        let path = fixture.config.train.images.join("b.png");
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        let assembler = DatasetAssembler::new(fixture.config.clone()).unwrap();
        let err = assembler
            .build_manifest(Split::Train, ManifestKind::Images)
            .unwrap_err();
        assert!(matches!(err, DatasetError::ImageDecode { .. }));
    }

    #[test]
    fn test_edge_spanning_masks_get_one_polygon() {
        let dir = tempfile::tempdir().unwrap();
        let train = split_dirs(dir.path(), "train");
        let valid = split_dirs(dir.path(), "valid");

        // Bottom band across the full width, then a fully white frame
        RgbImage::new(20, 16).save(train.images.join("band.png")).unwrap();
        let mut band = GrayImage::new(20, 16);
        for y in 10..16 {
            for x in 0..20 {
                band.put_pixel(x, y, Luma([255u8]));
            }
        }
        band.save(train.masks.join("band.png")).unwrap();

        RgbImage::new(10, 8).save(valid.images.join("full.png")).unwrap();
        RgbImage::from_pixel(10, 8, Rgb([255, 255, 255]))
            .save(valid.masks.join("full.png"))
            .unwrap();

        let assembler = DatasetAssembler::new(DatasetConfig::new(train, valid)).unwrap();
        for (split, width, height, area) in [(Split::Train, 20, 16, 120), (Split::Valid, 10, 8, 80)] {
            let Manifest::Annotations(records) = assembler
                .build_manifest(split, ManifestKind::Annotations)
                .unwrap()
            else {
                panic!("expected annotations");
            };
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].area, area);
            assert_eq!(records[0].segmentation.len(), 1);
            assert!(records[0].segmentation[0].fits_within(width, height));
        }
    }

    #[test]
    fn test_record_order_independent_of_thread_count() {
        let fixture = fixture();
        let sequential = DatasetAssembler::new(fixture.config.clone().with_jobs(1)).unwrap();
        let parallel = DatasetAssembler::new(fixture.config.clone().with_jobs(4)).unwrap();

        for kind in ManifestKind::iter() {
            let a = sequential.build_manifest(Split::Train, kind).unwrap();
            let b = parallel.build_manifest(Split::Train, kind).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_empty_mask_gives_empty_segmentation() {
        let dir = tempfile::tempdir().unwrap();
        let train = split_dirs(dir.path(), "train");
        let valid = split_dirs(dir.path(), "valid");
        RgbImage::new(10, 10).save(train.images.join("x.png")).unwrap();
        GrayImage::from_pixel(10, 10, Luma([0u8]))
            .save(train.masks.join("x.png"))
            .unwrap();

        let assembler = DatasetAssembler::new(DatasetConfig::new(train, valid)).unwrap();
        let manifest = assembler
            .build_manifest(Split::Train, ManifestKind::Annotations)
            .unwrap();
        match manifest {
            Manifest::Annotations(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].area, 0);
                assert!(records[0].segmentation.is_empty());
            }
            other => panic!("unexpected manifest: {other:?}"),
        }
    }

    #[test]
    fn test_zero_jobs_rejected() {
        let fixture = fixture();
        let err = DatasetAssembler::new(fixture.config.clone().with_jobs(0)).err().unwrap();
        assert!(matches!(err, DatasetError::InvalidSetting { .. }));
    }
}
