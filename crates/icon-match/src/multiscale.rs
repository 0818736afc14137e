//! Multi-scale SSIM matching: sweeps scale and offset candidates and
//! scores each with SSIM, returning the best-scoring placement.
//!
//! Callers are expected to have already masked and Gaussian-blurred both
//! `roi` and `template`; this module only handles the scale/offset
//! search and SSIM scoring.

use icon_imaging::{resize_scaled, ssim};
use image::RgbImage;

use crate::options::HINT_ANCHOR;

/// The best-scoring placement of `template` (at some scale) inside `roi`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleMatch {
    pub offset: (i32, i32),
    pub template_size: (u32, u32),
    pub score: f64,
    pub scale: f64,
    /// `true` when the search was narrowed to a single hinted offset per
    /// scale, `false` when every integer offset was swept.
    pub stepping: bool,
}

/// Searches every `scale` in `scales` for the best-SSIM placement of
/// `template` inside `roi`. When `offset_hint` is `Some((dx, dy))`, only
/// the single offset `(HINT_ANCHOR + dx, HINT_ANCHOR + dy)` (clamped to
/// fit) is tried per scale; otherwise every integer offset that fits is
/// swept. Returns `None` only if `template` never fits `roi` at any scale
/// — callers apply the SSIM threshold themselves.
pub fn multi_scale_match(roi: &RgbImage, template: &RgbImage, scales: &[f64], offset_hint: Option<(i32, i32)>) -> Option<ScaleMatch> {
    let (roi_w, roi_h) = roi.dimensions();
    let mut best: Option<ScaleMatch> = None;

    for &scale in scales {
        let resized = resize_scaled(template, scale);
        let (tw, th) = resized.dimensions();
        if tw == 0 || th == 0 || tw > roi_w || th > roi_h {
            continue;
        }

        let offsets: Vec<(i32, i32)> = match offset_hint {
            Some((dx, dy)) => {
                let x = (HINT_ANCHOR + dx).clamp(0, (roi_w - tw) as i32);
                let y = (HINT_ANCHOR + dy).clamp(0, (roi_h - th) as i32);
                vec![(x, y)]
            }
            None => {
                let mut offsets = Vec::new();
                for y in 0..=(roi_h - th) {
                    for x in 0..=(roi_w - tw) {
                        offsets.push((x as i32, y as i32));
                    }
                }
                offsets
            }
        };

        for (x, y) in offsets {
            let window = image::imageops::crop_imm(roi, x as u32, y as u32, tw, th).to_image();
            let score = ssim(&window, &resized);
            let better = best.as_ref().map(|b| score > b.score).unwrap_or(true);
            if better {
                best = Some(ScaleMatch {
                    offset: (x, y),
                    template_size: (tw, th),
                    score,
                    scale,
                    stepping: offset_hint.is_none(),
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn identical_template_at_full_scale_scores_near_one() {
        let roi = RgbImage::from_fn(47, 36, |x, y| Rgb([(x * 5) as u8, (y * 7) as u8, 10]));
        let template = roi.clone();
        let best = multi_scale_match(&roi, &template, &[1.0], None).unwrap();
        assert!(best.score > 0.99, "expected near-perfect score, got {}", best.score);
        assert!(!best.stepping);
    }

    #[test]
    fn hinted_search_only_tries_the_hinted_offset() {
        let roi = RgbImage::from_pixel(47, 36, Rgb([100, 100, 100]));
        let template = RgbImage::from_pixel(20, 15, Rgb([100, 100, 100]));
        let best = multi_scale_match(&roi, &template, &[1.0], Some((1, -1))).unwrap();
        assert!(best.stepping);
        assert_eq!(best.offset, (3, 1));
    }

    #[test]
    fn oversized_template_yields_no_match() {
        let roi = RgbImage::new(10, 10);
        let template = RgbImage::new(20, 20);
        assert!(multi_scale_match(&roi, &template, &[1.0], None).is_none());
    }
}
