//! The overlay detection stage itself: for each slot, sweeps overlay
//! variants, scales, and offsets, gated by barcode/hue checks and scored
//! by SSIM, to find the best-matching rarity overlay.

use std::collections::HashMap;

use icon_imaging::{adaptive_threshold_gaussian, normalize_to_reference, resize_scaled, ssim};
use icon_model::{OverlayDetection, OverlayDetectionResult, OverlayName, SlotMap, SlotRef};
use image::{GrayImage, Rgb, RgbImage, RgbaImage};
use rayon::prelude::*;
use tracing::debug;

use crate::barcode::{barcode_strip, compare_barcodes};
use crate::hue::classify_overlay_by_patch;
use crate::options::{OverlayOptions, REFERENCE_HEIGHT, REFERENCE_WIDTH};

/// Half the barcode stripe's own width: the analytic mask keeps only this
/// many leftmost columns of the (already-scaled) overlay and ROI crop.
const BOX_HALF_WIDTH: f64 = 4.0;

/// Columns of black padding appended to the right of a binarized barcode
/// strip before SSIM, matching the original's fixed 7px pad.
const STRIP_PAD: u32 = 7;

/// Drops the alpha channel; the original loads overlay references as
/// 3-channel BGR, so transparency plays no part in stripe comparison.
fn rgba_to_rgb(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        Rgb([p[0], p[1], p[2]])
    })
}

/// Zeroes every column at or beyond `keep_width`, leaving only the
/// leftmost stripe intact.
fn mask_left_columns(image: &RgbImage, keep_width: u32) -> RgbImage {
    let (w, h) = image.dimensions();
    let keep_width = keep_width.min(w);
    let mut out = image.clone();
    for y in 0..h {
        for x in keep_width..w {
            out.put_pixel(x, y, Rgb([0, 0, 0]));
        }
    }
    out
}

/// Binarizes a strip (adaptive Gaussian threshold) and pads it with
/// [`STRIP_PAD`] columns of black on the right.
fn binarize_and_pad(strip: &RgbImage) -> RgbImage {
    let (w, h) = strip.dimensions();
    let mut gray = GrayImage::new(w, h);
    for (x, y, pixel) in strip.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let luma = (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64).round() as u8;
        gray.put_pixel(x, y, image::Luma([luma]));
    }
    let binarized = adaptive_threshold_gaussian(&gray, 11, 2);

    let mut padded = RgbImage::new(w + STRIP_PAD, h);
    for (x, y, pixel) in binarized.enumerate_pixels() {
        let v = pixel[0];
        padded.put_pixel(x, y, Rgb([v, v, v]));
    }
    padded
}

/// Runs the barcode/hue-gated multi-scale SSIM search for one slot's ROI
/// against every non-common overlay, keeping only the single best-scoring
/// detection.
fn detect_for_slot(roi: &RgbImage, overlays: &HashMap<OverlayName, RgbImage>, options: &OverlayOptions) -> OverlayDetection {
    let (normalized_roi, _scale) = normalize_to_reference(roi, REFERENCE_WIDTH, REFERENCE_HEIGHT);
    let (roi_w, roi_h) = normalized_roi.dimensions();

    let mut best: Option<OverlayDetection> = None;

    for overlay_name in OverlayName::SCORED {
        let Some(overlay_rgb) = overlays.get(&overlay_name) else {
            continue;
        };

        for scale in options.scales() {
            let resized_overlay = resize_scaled(overlay_rgb, scale);
            let (ow, oh) = resized_overlay.dimensions();
            if ow == 0 || oh == 0 || ow > roi_w || oh > roi_h {
                continue;
            }

            let mask_width = ((BOX_HALF_WIDTH * scale).round().max(1.0)) as u32;
            let masked_overlay = mask_left_columns(&resized_overlay, mask_width);
            let overlay_strip = barcode_strip(&masked_overlay);

            for (dx, dy) in options.offsets() {
                let anchor_x = options.max_offset + dx;
                let anchor_y = options.max_offset + dy;
                if anchor_x < 0 || anchor_y < 0 {
                    continue;
                }
                let (anchor_x, anchor_y) = (anchor_x as u32, anchor_y as u32);
                if anchor_x + ow > roi_w || anchor_y + oh > roi_h {
                    continue;
                }

                let window = image::imageops::crop_imm(&normalized_roi, anchor_x, anchor_y, ow, oh).to_image();
                let masked_window = mask_left_columns(&window, mask_width);
                let window_strip = barcode_strip(&masked_window);

                if !compare_barcodes(&overlay_strip, &window_strip) {
                    continue;
                }
                if classify_overlay_by_patch(&window_strip) != Some(overlay_name) {
                    continue;
                }

                let padded_overlay = binarize_and_pad(&overlay_strip);
                let padded_window = binarize_and_pad(&window_strip);
                let score = ssim(&padded_overlay, &padded_window);

                let is_better = best.as_ref().map(|b| score > b.ssim).unwrap_or(true);
                if score > options.ssim_threshold && is_better {
                    best = Some(OverlayDetection {
                        overlay: overlay_name,
                        scale,
                        offset: Some((dx, dy)),
                        ssim: score,
                        method: icon_model::OverlayDetectionMethod::Detected,
                    });
                }
            }
        }
    }

    best.unwrap_or_else(OverlayDetection::fallback)
}

/// Runs overlay detection over every slot in `slots`.
pub fn run(slots: &SlotMap, overlays: &HashMap<OverlayName, RgbaImage>, options: &OverlayOptions) -> OverlayDetectionResult {
    let flattened: HashMap<OverlayName, RgbImage> = overlays.iter().map(|(name, img)| (*name, rgba_to_rgb(img))).collect();

    let work: Vec<(SlotRef, &RgbImage)> = slots
        .groups
        .iter()
        .flat_map(|(group_label, group_slots)| group_slots.iter().map(move |slot| (SlotRef::new(group_label.clone(), slot.slot_index), &slot.roi)))
        .collect();

    debug!(slots = work.len(), "detecting overlays with chunksize {}", options.chunksize);

    let results: Vec<(SlotRef, OverlayDetection)> = work
        .par_iter()
        .with_min_len(options.chunksize.max(1))
        .map(|(slot_ref, roi)| (slot_ref.clone(), detect_for_slot(roi, &flattened, options)))
        .collect();

    let mut output = OverlayDetectionResult::new();
    for (slot_ref, detection) in results {
        if detection.method == icon_model::OverlayDetectionMethod::Fallback {
            debug!(group = %slot_ref.group_label, slot = slot_ref.slot_index, "no overlay cleared threshold, falling back to common");
        }
        output.insert(&slot_ref, detection);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use icon_model::{BBox, Hash64, Slot};

    fn solid_roi(w: u32, h: u32, color: Rgb<u8>) -> RgbImage {
        RgbImage::from_pixel(w, h, color)
    }

    #[test]
    fn empty_overlay_catalog_falls_back_to_common() {
        let mut slots = SlotMap::new();
        slots.insert_group(
            "Fore Weapon",
            vec![Slot::new("Fore Weapon", 0, BBox::new(0, 0, 47, 36), solid_roi(47, 36, Rgb([20, 20, 20])), Hash64::new(0), Hash64::new(0))],
        );
        let overlays = HashMap::new();
        let detection = run(&slots, &overlays, &OverlayOptions::default());
        let got = detection.get(&SlotRef::new("Fore Weapon", 0)).unwrap();
        assert_eq!(got.method, icon_model::OverlayDetectionMethod::Fallback);
        assert_eq!(got.overlay, OverlayName::Common);
    }

    #[test]
    fn no_overlay_clears_threshold_against_a_flat_roi() {
        let mut slots = SlotMap::new();
        slots.insert_group(
            "Fore Weapon",
            vec![Slot::new("Fore Weapon", 0, BBox::new(0, 0, 47, 36), solid_roi(47, 36, Rgb([20, 20, 20])), Hash64::new(0), Hash64::new(0))],
        );
        let mut overlays = HashMap::new();
        overlays.insert(OverlayName::Rare, RgbaImage::from_pixel(36, 36, image::Rgba([30, 144, 255, 255])));
        let detection = run(&slots, &overlays, &OverlayOptions::default());
        let got = detection.get(&SlotRef::new("Fore Weapon", 0)).unwrap();
        // A gray, unsaturated ROI never classifies as any hue band, so the
        // step 4b gate rejects every candidate and we fall back.
        assert_eq!(got.method, icon_model::OverlayDetectionMethod::Fallback);
    }
}
