//! Alpha-blending a rarity overlay onto a catalog icon.

use image::{Rgb, RgbImage, RgbaImage};

/// Alpha-blends `overlay` (RGBA) onto `base` (RGB), resizing the overlay
/// to the base's dimensions first if they differ. Standard `src-over`
/// compositing: `out = src*a + dst*(1-a)`.
pub fn alpha_blend(base: &RgbImage, overlay: &RgbaImage) -> RgbImage {
    let (bw, bh) = base.dimensions();
    let overlay = if overlay.dimensions() == (bw, bh) {
        overlay.clone()
    } else {
        image::imageops::resize(overlay, bw, bh, image::imageops::FilterType::Lanczos3)
    };

    let mut out = base.clone();
    for y in 0..bh {
        for x in 0..bw {
            let dst = base.get_pixel(x, y);
            let src = overlay.get_pixel(x, y);
            let a = src[3] as f32 / 255.0;
            let blended = Rgb([
                blend_channel(src[0], dst[0], a),
                blend_channel(src[1], dst[1], a),
                blend_channel(src[2], dst[2], a),
            ]);
            out.put_pixel(x, y, blended);
        }
    }
    out
}

fn blend_channel(src: u8, dst: u8, a: f32) -> u8 {
    let v = src as f32 * a + dst as f32 * (1.0 - a);
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn fully_opaque_overlay_replaces_base() {
        let base = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        let overlay = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        let out = alpha_blend(&base, &overlay);
        assert_eq!(*out.get_pixel(0, 0), Rgb([255, 0, 0]));
    }

    #[test]
    fn fully_transparent_overlay_keeps_base() {
        let base = RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]));
        let overlay = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 0]));
        let out = alpha_blend(&base, &overlay);
        assert_eq!(*out.get_pixel(0, 0), Rgb([10, 20, 30]));
    }
}
