//! COCO-style image and annotation records
//!
//! Field order matches the serialized key order of the manifests.

use mask::{MaskGeometry, Polygon};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The only category this dataset knows about
pub const DEFAULT_CATEGORY_ID: u32 = 1;
/// Bounding boxes are not computed; every annotation carries this placeholder
pub const DEFAULT_BBOX: [u32; 4] = [0, 0, 0, 0];
pub const DEFAULT_ISCROWD: u8 = 0;

/// COCO image information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImageRecord {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub file_name: String,
}

impl ImageRecord {
    pub fn new(id: u64, width: u32, height: u32, file_name: impl Into<String>) -> Self {
        Self {
            id,
            width,
            height,
            file_name: file_name.into(),
        }
    }

    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ImageRecord)
    }
}

/// COCO annotation information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnnotationRecord {
    pub id: u64,
    pub image_id: u64,
    pub category_id: u32,
    pub segmentation: Vec<Polygon>,
    /// Foreground pixel count of the mask
    pub area: u64,
    /// `[x, y, width, height]`
    pub bbox: [u32; 4],
    pub iscrowd: u8,
}

impl AnnotationRecord {
    /// Single-category annotation with a placeholder bbox and `iscrowd = 0`
    pub fn new(id: u64, image_id: u64, segmentation: Vec<Polygon>, area: u64) -> Self {
        Self {
            id,
            image_id,
            category_id: DEFAULT_CATEGORY_ID,
            segmentation,
            area,
            bbox: DEFAULT_BBOX,
            iscrowd: DEFAULT_ISCROWD,
        }
    }

    /// Annotation carrying the polygons and area of one processed mask
    pub fn from_geometry(id: u64, image_id: u64, geometry: MaskGeometry) -> Self {
        Self::new(id, image_id, geometry.polygons, geometry.area)
    }

    pub fn with_category_id(mut self, category_id: u32) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn with_bbox(mut self, bbox: [u32; 4]) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn with_iscrowd(mut self, iscrowd: u8) -> Self {
        self.iscrowd = iscrowd;
        self
    }

    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AnnotationRecord)
    }
}
