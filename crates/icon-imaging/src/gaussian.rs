//! Small blur kernels used ahead of thresholding and hue classification.

use image::{GrayImage, Luma};

/// 3x3 approximately-Gaussian blur (kernel `[1 2 1; 2 4 2; 1 2 1] / 16`)
/// with edge-clamped sampling.
pub fn blur3x3(image: &GrayImage) -> GrayImage {
    const KERNEL: [[u32; 3]; 3] = [[1, 2, 1], [2, 4, 2], [1, 2, 1]];
    const WEIGHT: u32 = 16;

    let (w, h) = image.dimensions();
    let mut out = GrayImage::new(w, h);
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let mut acc = 0u32;
            for (ky, row) in KERNEL.iter().enumerate() {
                for (kx, weight) in row.iter().enumerate() {
                    let sx = (x + kx as i32 - 1).clamp(0, w as i32 - 1) as u32;
                    let sy = (y + ky as i32 - 1).clamp(0, h as i32 - 1) as u32;
                    acc += weight * image.get_pixel(sx, sy)[0] as u32;
                }
            }
            out.put_pixel(x as u32, y as u32, Luma([(acc / WEIGHT) as u8]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blurring_a_flat_image_is_identity() {
        let img = GrayImage::from_pixel(10, 10, Luma([128]));
        let out = blur3x3(&img);
        assert!(out.pixels().all(|p| p.0[0] == 128));
    }

    #[test]
    fn blurring_smooths_a_single_spike() {
        let mut img = GrayImage::from_pixel(9, 9, Luma([0]));
        img.put_pixel(4, 4, Luma([255]));
        let out = blur3x3(&img);
        assert!(out.get_pixel(4, 4)[0] < 255);
        assert!(out.get_pixel(4, 4)[0] > 0);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
    }
}
