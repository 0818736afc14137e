//! Structural similarity (SSIM), the scoring metric for the overlay
//! detector and icon matcher.
//!
//! Uses a uniform `7x7` window (matching skimage's default `win_size=7`
//! for 8-bit images) evaluated independently per RGB channel, then
//! averaged. Windows near the border are clamped rather than padded.

use image::RgbImage;

const WIN_SIZE: i32 = 7;
const L: f64 = 255.0;
const C1: f64 = (0.01 * L) * (0.01 * L);
const C2: f64 = (0.03 * L) * (0.03 * L);

/// Computes mean SSIM between two equally-sized RGB images. Panics if the
/// dimensions differ; callers are expected to normalize both images to a
/// common size first (see [`crate::resize::normalize_to_reference`]).
pub fn ssim(a: &RgbImage, b: &RgbImage) -> f64 {
    assert_eq!(a.dimensions(), b.dimensions(), "ssim requires equally-sized images");
    let (w, h) = a.dimensions();
    if w == 0 || h == 0 {
        return 0.0;
    }

    let mut channel_scores = [0.0; 3];
    for channel in 0..3 {
        let ca: Vec<f64> = a.pixels().map(|p| p.0[channel] as f64).collect();
        let cb: Vec<f64> = b.pixels().map(|p| p.0[channel] as f64).collect();
        channel_scores[channel] = ssim_single_channel(&ca, &cb, w, h);
    }
    channel_scores.iter().sum::<f64>() / 3.0
}

fn ssim_single_channel(a: &[f64], b: &[f64], w: u32, h: u32) -> f64 {
    let radius = WIN_SIZE / 2;
    let (w, h) = (w as i32, h as i32);
    let mut total = 0.0;
    let mut windows = 0u32;

    for cy in 0..h {
        for cx in 0..w {
            let mut sum_a = 0.0;
            let mut sum_b = 0.0;
            let mut sum_aa = 0.0;
            let mut sum_bb = 0.0;
            let mut sum_ab = 0.0;
            let mut n = 0.0;

            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let sx = (cx + dx).clamp(0, w - 1);
                    let sy = (cy + dy).clamp(0, h - 1);
                    let idx = (sy * w + sx) as usize;
                    let va = a[idx];
                    let vb = b[idx];
                    sum_a += va;
                    sum_b += vb;
                    sum_aa += va * va;
                    sum_bb += vb * vb;
                    sum_ab += va * vb;
                    n += 1.0;
                }
            }

            let mean_a = sum_a / n;
            let mean_b = sum_b / n;
            let var_a = sum_aa / n - mean_a * mean_a;
            let var_b = sum_bb / n - mean_b * mean_b;
            let covar = sum_ab / n - mean_a * mean_b;

            let numerator = (2.0 * mean_a * mean_b + C1) * (2.0 * covar + C2);
            let denominator = (mean_a * mean_a + mean_b * mean_b + C1) * (var_a + var_b + C2);
            total += numerator / denominator;
            windows += 1;
        }
    }

    total / windows as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn identical_images_score_one() {
        let img = RgbImage::from_fn(32, 24, |x, y| Rgb([(x * 7) as u8, (y * 11) as u8, 50]));
        let score = ssim(&img, &img);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn very_different_images_score_low() {
        let a = RgbImage::from_pixel(32, 24, Rgb([0, 0, 0]));
        let b = RgbImage::from_pixel(32, 24, Rgb([255, 255, 255]));
        let score = ssim(&a, &b);
        assert!(score < 0.3, "expected a low score, got {score}");
    }

    #[test]
    #[should_panic]
    fn mismatched_dimensions_panics() {
        let a = RgbImage::new(10, 10);
        let b = RgbImage::new(11, 10);
        ssim(&a, &b);
    }
}
