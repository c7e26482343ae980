use image::GrayImage;
use imageproc::contours::BorderType;

use crate::{
    error::{MaskError, Result},
    traits::PolygonExtractor,
    types::Polygon,
};

/// Suzuki-Abe border following via imageproc.
///
/// Every border pixel is kept as a point; nothing is simplified. Polygons
/// come out in tracing order and the contour hierarchy is dropped.
///
/// The mask is traced inside a one pixel background frame, so regions
/// touching the image edges (or filling it entirely) still get a border.
#[derive(Debug, Clone, Copy)]
pub struct BorderFollowingExtractor {
    /// Also emit the borders of holes inside foreground regions
    pub include_holes: bool,
}

impl Default for BorderFollowingExtractor {
    fn default() -> Self {
        Self { include_holes: true }
    }
}

impl BorderFollowingExtractor {
    /// Only outer borders of each foreground component
    pub fn outer_only() -> Self {
        Self { include_holes: false }
    }
}

impl PolygonExtractor for BorderFollowingExtractor {
    fn extract_polygons(&self, binary_image: &GrayImage) -> Result<Vec<Polygon>> {
        let contours = imageproc::contours::find_contours::<i32>(&framed(binary_image));

        contours
            .into_iter()
            .filter(|contour| self.include_holes || matches!(contour.border_type, BorderType::Outer))
            .map(|contour| {
                contour
                    .points
                    .iter()
                    .map(|p| {
                        let x = u32::try_from(p.x - 1);
                        let y = u32::try_from(p.y - 1);
                        match (x, y) {
                            (Ok(x), Ok(y)) => Ok((x, y)),
                            _ => Err(MaskError::ImageProcessing(format!(
                                "contour point ({}, {}) outside the image",
                                p.x - 1,
                                p.y - 1
                            ))),
                        }
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(Polygon::from_points)
            })
            .collect()
    }
}

/// Copy of `mask` surrounded by a one pixel background border
fn framed(mask: &GrayImage) -> GrayImage {
    let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
    image::imageops::replace(&mut padded, mask, 1, 1);
    padded
}
