//! Perceptual hash (pHash): DCT-based, robust to resizing and mild color
//! shifts.

use icon_model::Hash64;
use image::{imageops::FilterType, GrayImage, RgbImage};

const DCT_SIZE: usize = 32;
const LOW_FREQ: usize = 8;

/// Computes the 64-bit pHash of `image`: downscale to grayscale 32x32, run a
/// 2D DCT-II, keep the top-left 8x8 low-frequency block (excluding the DC
/// term), and set a bit for each coefficient that exceeds the block's
/// median.
pub fn compute_phash(image: &RgbImage) -> Hash64 {
    let gray = to_grayscale_32x32(image);
    let dct = dct_2d(&gray);

    let mut coeffs = Vec::with_capacity(LOW_FREQ * LOW_FREQ - 1);
    for v in 0..LOW_FREQ {
        for u in 0..LOW_FREQ {
            if u == 0 && v == 0 {
                continue;
            }
            coeffs.push(dct[v][u]);
        }
    }
    let median = median_of(&coeffs);

    let mut bits: u64 = 0;
    let mut bit_index = 0u32;
    for v in 0..LOW_FREQ {
        for u in 0..LOW_FREQ {
            if u == 0 && v == 0 {
                continue;
            }
            if dct[v][u] > median {
                bits |= 1u64 << bit_index;
            }
            bit_index += 1;
            if bit_index >= 64 {
                break;
            }
        }
    }
    Hash64(bits)
}

fn to_grayscale_32x32(image: &RgbImage) -> GrayImage {
    let resized = image::imageops::resize(image, DCT_SIZE as u32, DCT_SIZE as u32, FilterType::Lanczos3);
    image::DynamicImage::ImageRgb8(resized).to_luma8()
}

/// Naive O(n^3) 2D DCT-II over an `n x n` grid. `n=32` keeps this cheap
/// enough to avoid pulling in an FFT dependency.
fn dct_2d(image: &GrayImage) -> [[f64; DCT_SIZE]; DCT_SIZE] {
    let n = DCT_SIZE;
    let pixels: Vec<Vec<f64>> = (0..n)
        .map(|y| (0..n).map(|x| image.get_pixel(x as u32, y as u32)[0] as f64).collect())
        .collect();

    // Separable DCT: rows first, then columns.
    let mut row_dct = vec![vec![0.0; n]; n];
    for y in 0..n {
        for u in 0..n {
            row_dct[y][u] = dct_1d(&pixels[y], u, n);
        }
    }

    let mut out = [[0.0; DCT_SIZE]; DCT_SIZE];
    for u in 0..n {
        let column: Vec<f64> = (0..n).map(|y| row_dct[y][u]).collect();
        for v in 0..n {
            out[v][u] = dct_1d(&column, v, n);
        }
    }
    out
}

fn dct_1d(values: &[f64], k: usize, n: usize) -> f64 {
    let alpha = if k == 0 { (1.0 / n as f64).sqrt() } else { (2.0 / n as f64).sqrt() };
    let sum: f64 = values
        .iter()
        .enumerate()
        .map(|(i, &x)| x * (std::f64::consts::PI * (2.0 * i as f64 + 1.0) * k as f64 / (2.0 * n as f64)).cos())
        .sum();
    alpha * sum
}

fn median_of(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn identical_images_hash_identically() {
        let img = RgbImage::from_fn(64, 64, |x, y| Rgb([(x * 3) as u8, (y * 5) as u8, ((x + y) * 2) as u8]));
        assert_eq!(compute_phash(&img), compute_phash(&img));
    }

    #[test]
    fn flat_image_produces_a_stable_hash() {
        let img = RgbImage::from_pixel(32, 32, Rgb([128, 128, 128]));
        let h1 = compute_phash(&img);
        let h2 = compute_phash(&img);
        assert_eq!(h1, h2);
    }

    #[test]
    fn distinct_patterns_differ() {
        let a = RgbImage::from_fn(64, 64, |x, _y| Rgb([(x * 4) as u8, 0, 0]));
        let b = RgbImage::from_fn(64, 64, |_x, y| Rgb([0, (y * 4) as u8, 0]));
        assert_ne!(compute_phash(&a), compute_phash(&b));
    }
}
