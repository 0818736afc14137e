//! The raw input image for one pipeline run.

use std::sync::Arc;

use image::RgbImage;

/// The longest edge a screenshot (or ROI derived from it) is allowed to
/// have after the optional downscale pass, preserving aspect ratio.
pub const MAX_SCREENSHOT_WIDTH: u32 = 1920;
pub const MAX_SCREENSHOT_HEIGHT: u32 = 1080;

/// A decoded 3-channel screenshot, owned for the lifetime of one pipeline
/// run. Cheaply cloneable: the pixel buffer is reference-counted so stages
/// and worker-pool tasks can share it without copying.
#[derive(Debug, Clone)]
pub struct Screenshot {
    image: Arc<RgbImage>,
}

impl Screenshot {
    pub fn new(image: RgbImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Resizes so neither dimension exceeds the configured bound while
    /// preserving aspect ratio. A no-op if already within bounds.
    pub fn resize_to_bounds(&self, max_width: u32, max_height: u32) -> Self {
        let (w, h) = (self.width(), self.height());
        if w <= max_width && h <= max_height {
            return self.clone();
        }
        let scale = (max_width as f64 / w as f64).min(max_height as f64 / h as f64);
        let new_w = ((w as f64 * scale).round() as u32).max(1);
        let new_h = ((h as f64 * scale).round() as u32).max(1);
        let resized = image::imageops::resize(
            self.image.as_ref(),
            new_w,
            new_h,
            image::imageops::FilterType::Lanczos3,
        );
        Self::new(resized)
    }
}
