use image::GrayImage;
use crate::{error::Result, traits::AreaEstimator};
use super::preprocessing::FOREGROUND;

/// Area as the number of foreground pixels
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelCountAreaEstimator;

impl AreaEstimator for PixelCountAreaEstimator {
    fn estimate_area(&self, binary_image: &GrayImage) -> Result<u64> {
        let count = binary_image
            .pixels()
            .filter(|p| p[0] == FOREGROUND)
            .count();
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_empty_mask_has_zero_area() {
        let img = GrayImage::new(64, 48);
        assert_eq!(PixelCountAreaEstimator.estimate_area(&img).unwrap(), 0);
    }

    #[test]
    fn test_filled_rectangle_area() {
        let mut img = GrayImage::new(100, 80);
        for y in 10..40 {
            for x in 20..70 {
                img.put_pixel(x, y, Luma([255u8]));
            }
        }
        assert_eq!(PixelCountAreaEstimator.estimate_area(&img).unwrap(), 50 * 30);
    }

    #[test]
    fn test_full_mask_area() {
        let img = GrayImage::from_pixel(7, 9, Luma([255u8]));
        assert_eq!(PixelCountAreaEstimator.estimate_area(&img).unwrap(), 63);
    }
}
