//! Resizing helpers shared by the hash index, overlay detector, and
//! matcher.

use image::imageops::FilterType;
use image::RgbImage;

/// Resizes to an exact `width x height`, as used before hashing.
pub fn resize_exact(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    image::imageops::resize(image, width, height, FilterType::Lanczos3)
}

/// Resizes by a uniform scale factor.
pub fn resize_scaled(image: &RgbImage, scale: f64) -> RgbImage {
    let (w, h) = image.dimensions();
    let new_w = ((w as f64 * scale).round() as u32).max(1);
    let new_h = ((h as f64 * scale).round() as u32).max(1);
    image::imageops::resize(image, new_w, new_h, FilterType::Lanczos3)
}

/// The slot-normalization rule shared by the overlay detector and
/// matcher: if the ROI is not exactly `(ref_w, ref_h)`, resize it
/// (preserving aspect via the smaller scale factor) to match, returning
/// the scale factor used so callers can map coordinates back.
pub fn normalize_to_reference(image: &RgbImage, ref_width: u32, ref_height: u32) -> (RgbImage, f64) {
    let (w, h) = image.dimensions();
    if w == ref_width && h == ref_height {
        return (image.clone(), 1.0);
    }
    let scale = (ref_width as f64 / w as f64).min(ref_height as f64 / h as f64);
    (resize_scaled(image, scale), scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_identity_when_already_reference_size() {
        let img = RgbImage::new(47, 36);
        let (out, scale) = normalize_to_reference(&img, 47, 36);
        assert_eq!(scale, 1.0);
        assert_eq!(out.dimensions(), (47, 36));
    }

    #[test]
    fn normalize_scales_by_smaller_factor() {
        let img = RgbImage::new(94, 36);
        let (out, scale) = normalize_to_reference(&img, 47, 36);
        assert!(scale < 1.0);
        assert!(out.width() <= 47 && out.height() <= 36);
    }
}
