//! Hue classification of a barcode patch: circular-mean hue over the
//! colorful pixels of a patch, binned into rarity bands.

use icon_imaging::rgb_to_hsv;
use icon_model::OverlayName;
use image::RgbImage;

/// Minimum saturation for a pixel to count as "colorful".
pub const MIN_SAT: f64 = 0.2;
/// Minimum value for a pixel to count as "colorful".
pub const MIN_VAL: f64 = 0.3;
/// Minimum fraction of colorful pixels required to trust the hue band.
pub const FRAC_COLORFUL_THRESHOLD: f64 = 0.3;

/// Classifies a patch by its circular-mean hue over "colorful" pixels
/// (saturation >= [`MIN_SAT`], value >= [`MIN_VAL`]). Returns `None`
/// (classified as "common"/unknown) when fewer than
/// [`FRAC_COLORFUL_THRESHOLD`] of pixels are colorful, or when the mean
/// hue falls outside every named band.
pub fn classify_overlay_by_patch(patch: &RgbImage) -> Option<OverlayName> {
    let hsv: Vec<_> = patch.pixels().map(|p| rgb_to_hsv(*p)).collect();
    if hsv.is_empty() {
        return None;
    }

    let colorful: Vec<f64> = hsv
        .iter()
        .filter(|c| c.sat >= MIN_SAT && c.val >= MIN_VAL)
        .map(|c| c.hue)
        .collect();

    let frac_colorful = colorful.len() as f64 / hsv.len() as f64;
    if frac_colorful < FRAC_COLORFUL_THRESHOLD {
        return None;
    }

    let (sin_sum, cos_sum) = colorful.iter().fold((0.0, 0.0), |(s, c), &hue| {
        let rad = hue.to_radians();
        (s + rad.sin(), c + rad.cos())
    });
    let mean_hue = sin_sum.atan2(cos_sum).to_degrees().rem_euclid(360.0);

    classify_hue_band(mean_hue)
}

/// Narrowed hue bands from step 4b. `None` for hues that
/// fall in none of the named bands ("unknown" in the original).
fn classify_hue_band(hue_deg: f64) -> Option<OverlayName> {
    if (40.0..60.0).contains(&hue_deg) {
        Some(OverlayName::Epic)
    } else if (100.0..115.0).contains(&hue_deg) {
        Some(OverlayName::Uncommon)
    } else if (205.0..220.0).contains(&hue_deg) {
        Some(OverlayName::Rare)
    } else if (240.0..263.0).contains(&hue_deg) {
        Some(OverlayName::VeryRare)
    } else if (263.0..290.0).contains(&hue_deg) {
        Some(OverlayName::UltraRare)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn grayscale_patch_is_uncolorful() {
        let patch = RgbImage::from_pixel(4, 4, Rgb([128, 128, 128]));
        assert_eq!(classify_overlay_by_patch(&patch), None);
    }

    #[test]
    fn saturated_blue_patch_classifies_as_very_rare() {
        // Hue ~240deg (pure blue) at high saturation/value.
        let patch = RgbImage::from_pixel(4, 4, Rgb([0, 0, 255]));
        assert_eq!(classify_overlay_by_patch(&patch), Some(OverlayName::VeryRare));
    }

    #[test]
    fn saturated_cyan_patch_falls_outside_every_band() {
        // Hue 180deg falls outside every band -> None (unknown/common).
        let patch = RgbImage::from_pixel(4, 4, Rgb([0, 255, 255]));
        assert_eq!(classify_overlay_by_patch(&patch), None);
    }
}
