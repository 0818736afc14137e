//! Difference hash (dHash): cheap, orientation-sensitive complement to
//! pHash.

use icon_model::Hash64;
use image::{imageops::FilterType, RgbImage};

const HASH_WIDTH: u32 = 9;
const HASH_HEIGHT: u32 = 8;

/// Computes the 64-bit dHash of `image`: downscale to grayscale 9x8, and
/// set a bit for each pixel that is brighter than its left neighbor.
pub fn compute_dhash(image: &RgbImage) -> Hash64 {
    let resized = image::imageops::resize(image, HASH_WIDTH, HASH_HEIGHT, FilterType::Lanczos3);
    let gray = image::DynamicImage::ImageRgb8(resized).to_luma8();

    let mut bits: u64 = 0;
    let mut bit_index = 0u32;
    for y in 0..HASH_HEIGHT {
        for x in 0..HASH_WIDTH - 1 {
            let left = gray.get_pixel(x, y)[0];
            let right = gray.get_pixel(x + 1, y)[0];
            if right > left {
                bits |= 1u64 << bit_index;
            }
            bit_index += 1;
        }
    }
    Hash64(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn identical_images_hash_identically() {
        let img = RgbImage::from_fn(64, 64, |x, y| Rgb([(x * 3) as u8, (y * 5) as u8, ((x + y) * 2) as u8]));
        assert_eq!(compute_dhash(&img), compute_dhash(&img));
    }

    #[test]
    fn left_to_right_ramp_sets_every_bit() {
        let img = RgbImage::from_fn(256, 8, |x, _y| Rgb([x as u8, x as u8, x as u8]));
        let hash = compute_dhash(&img);
        assert_eq!(hash.0.count_ones(), 64);
    }

    #[test]
    fn flat_image_sets_no_bits() {
        let img = RgbImage::from_pixel(64, 64, Rgb([100, 100, 100]));
        let hash = compute_dhash(&img);
        assert_eq!(hash.0.count_ones(), 0);
    }
}
