//! Barcode-stripe run-length comparison: extracts the left-edge dark/light
//! stripe pattern from a rarity overlay and compares run lengths against
//! a candidate.

use icon_imaging::adaptive_threshold_gaussian;
use image::{GenericImageView, RgbImage};

/// A contiguous run of "off" rows within a barcode strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: u32,
    pub end: u32,
}

/// The barcode strip is the leftmost 3 columns of a masked overlay or
/// ROI crop.
pub const BARCODE_WIDTH: u32 = 3;

/// Fraction of top rows ignored when hunting for stripe runs
/// (`ignore_top_frac`).
pub const IGNORE_TOP_FRAC: f64 = 0.3;

/// A row counts as "off" only if at least this many of the strip's
/// columns are below the adaptive threshold (`min_off_cols`).
pub const MIN_OFF_COLS: u32 = 3;

/// Position tolerance (rows) for a matching run's start/end (`pos_tol`).
pub const POS_TOL: i64 = 2;

/// Length tolerance (rows) for a matching run's length (`len_tol`).
pub const LEN_TOL: i64 = 2;

/// ITU-R BT.601 luma, matching `cv2.cvtColor(..., COLOR_BGR2GRAY)`.
fn luma(pixel: image::Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64).round() as u8
}

/// Finds the runs of "off" rows in a barcode strip.
pub fn find_off_strips(strip: &RgbImage) -> Vec<Segment> {
    let (w, h) = strip.dimensions();
    let mut gray = image::GrayImage::new(w, h);
    for (x, y, pixel) in strip.enumerate_pixels() {
        gray.put_pixel(x, y, image::Luma([luma(*pixel)]));
    }
    let binarized = adaptive_threshold_gaussian(&gray, 11, 2);

    let off_rows: Vec<bool> = (0..h)
        .map(|y| {
            let off_count = (0..w).filter(|&x| binarized.get_pixel(x, y)[0] == 0).count() as u32;
            off_count >= MIN_OFF_COLS
        })
        .collect();

    let margin = (h as f64 * IGNORE_TOP_FRAC) as u32;
    let mut segments = Vec::new();
    let mut run_start: Option<u32> = None;
    for (y, &is_off) in off_rows.iter().enumerate() {
        let y = y as u32;
        match (is_off, run_start) {
            (true, None) => run_start = Some(y),
            (false, Some(start)) => {
                let end = y - 1;
                if start >= margin && end >= margin {
                    segments.push(Segment { start, end });
                }
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        if start >= margin {
            segments.push(Segment { start, end: h - 1 });
        }
    }
    segments
}

/// Compares two barcode strips: same run count, and every run aligned
/// within tolerance.
pub fn compare_barcodes(strip_a: &RgbImage, strip_b: &RgbImage) -> bool {
    let segs_a = find_off_strips(strip_a);
    let segs_b = find_off_strips(strip_b);

    if segs_a.len() != segs_b.len() {
        return false;
    }
    segs_a.iter().zip(segs_b.iter()).all(|(a, b)| {
        (a.start as i64 - b.start as i64).abs() <= POS_TOL
            && (a.end as i64 - b.end as i64).abs() <= POS_TOL
            && ((a.end as i64 - a.start as i64) - (b.end as i64 - b.start as i64)).abs() <= LEN_TOL
    })
}

/// Crops the leftmost [`BARCODE_WIDTH`] columns of `image`.
pub fn barcode_strip(image: &RgbImage) -> RgbImage {
    let (w, h) = image.dimensions();
    let width = BARCODE_WIDTH.min(w);
    image.view(0, 0, width, h).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn striped_strip(pattern: &[bool]) -> RgbImage {
        let h = pattern.len() as u32;
        RgbImage::from_fn(3, h, |_x, y| {
            if pattern[y as usize] {
                Rgb([10, 10, 10])
            } else {
                Rgb([240, 240, 240])
            }
        })
    }

    #[test]
    fn identical_strips_compare_equal() {
        let pattern = vec![false, false, false, true, true, false, false, false, false, false];
        let a = striped_strip(&pattern);
        let b = striped_strip(&pattern);
        assert!(compare_barcodes(&a, &b));
    }

    #[test]
    fn differing_run_counts_do_not_match() {
        let a = striped_strip(&[false; 10]);
        let mut pattern_b = vec![false; 10];
        pattern_b[7] = true;
        let b = striped_strip(&pattern_b);
        assert!(!compare_barcodes(&a, &b));
    }
}
