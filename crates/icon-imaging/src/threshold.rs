//! Adaptive thresholding and HSV conversion used by the overlay detector's
//! barcode-stripe extraction and hue classification.

use image::{GrayImage, Rgb, RgbImage};

/// Mean-weighted adaptive threshold, mirroring `cv2.ADAPTIVE_THRESH_GAUSSIAN_C`
/// with an odd `block_size` and constant `c`: each pixel is compared against
/// the blurred local mean of its `block_size x block_size` neighborhood minus
/// `c`. Output is binary: `255` where the source pixel exceeds the local
/// threshold, `0` otherwise.
pub fn adaptive_threshold_gaussian(image: &GrayImage, block_size: u32, c: i32) -> GrayImage {
    assert!(block_size % 2 == 1, "block_size must be odd");
    let radius = (block_size / 2) as i32;
    let (w, h) = image.dimensions();
    let mut out = GrayImage::new(w, h);

    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let mut sum = 0u64;
            let mut count = 0u64;
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let sx = (x + dx).clamp(0, w as i32 - 1) as u32;
                    let sy = (y + dy).clamp(0, h as i32 - 1) as u32;
                    sum += image.get_pixel(sx, sy)[0] as u64;
                    count += 1;
                }
            }
            let local_mean = (sum / count) as i32;
            let pixel = image.get_pixel(x as u32, y as u32)[0] as i32;
            let value = if pixel > local_mean - c { 255 } else { 0 };
            out.put_pixel(x as u32, y as u32, image::Luma([value]));
        }
    }
    out
}

/// Pixel hue/saturation/value in the ranges `hue in [0, 360)`, `sat, val in
/// [0, 1]`, matching the conventions used by `classify_overlay_by_patch`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub hue: f64,
    pub sat: f64,
    pub val: f64,
}

pub fn rgb_to_hsv(Rgb([r, g, b]): Rgb<u8>) -> Hsv {
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    let sat = if max == 0.0 { 0.0 } else { delta / max };
    Hsv { hue: hue.rem_euclid(360.0), sat, val: max }
}

/// Converts every pixel of an RGB image to HSV.
pub fn image_to_hsv(image: &RgbImage) -> Vec<Hsv> {
    image.pixels().map(|p| rgb_to_hsv(*p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_red_has_zero_hue_full_sat_full_val() {
        let hsv = rgb_to_hsv(Rgb([255, 0, 0]));
        assert_eq!(hsv.hue, 0.0);
        assert_eq!(hsv.sat, 1.0);
        assert_eq!(hsv.val, 1.0);
    }

    #[test]
    fn gray_has_zero_saturation() {
        let hsv = rgb_to_hsv(Rgb([128, 128, 128]));
        assert_eq!(hsv.sat, 0.0);
    }

    #[test]
    fn adaptive_threshold_of_flat_image_is_all_zero() {
        let img = GrayImage::from_pixel(20, 20, image::Luma([100]));
        let out = adaptive_threshold_gaussian(&img, 11, 2);
        assert!(out.pixels().all(|p| p.0[0] == 0));
    }
}
