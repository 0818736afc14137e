//! Binary masking applied before hashing and matching.

use icon_model::MaskType;
use image::{Rgb, RgbImage};

/// Zeroes the pixels for which `mask_type` says to suppress, returning a
/// fresh image. `BottomRightQuadrant` zeroes `x >= W/2 && y >= 3H/4`.
pub fn apply_mask(image: &RgbImage, mask_type: MaskType) -> RgbImage {
    match mask_type {
        MaskType::None => image.clone(),
        MaskType::BottomRightQuadrant => {
            let (w, h) = image.dimensions();
            let x_cut = w / 2;
            let y_cut = (3 * h) / 4;
            let mut out = image.clone();
            for y in y_cut..h {
                for x in x_cut..w {
                    out.put_pixel(x, y, Rgb([0, 0, 0]));
                }
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_right_quadrant_is_zeroed() {
        let img = RgbImage::from_pixel(16, 16, Rgb([200, 150, 100]));
        let masked = apply_mask(&img, MaskType::BottomRightQuadrant);
        // (12, 12) is inside x>=8, y>=12
        assert_eq!(*masked.get_pixel(12, 12), Rgb([0, 0, 0]));
        // (0, 0) untouched
        assert_eq!(*masked.get_pixel(0, 0), Rgb([200, 150, 100]));
        // (12, 5) has x>=8 but y<12, untouched
        assert_eq!(*masked.get_pixel(12, 5), Rgb([200, 150, 100]));
    }

    #[test]
    fn none_mask_is_identity() {
        let img = RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]));
        let masked = apply_mask(&img, MaskType::None);
        assert_eq!(img, masked);
    }
}
