//! Overlay-detector tunables.

/// The slot ROI and overlay references are normalized to this size before
/// stripe extraction.
pub const REFERENCE_WIDTH: u32 = 47;
pub const REFERENCE_HEIGHT: u32 = 36;

#[derive(Debug, Clone, Copy)]
pub struct OverlayOptions {
    pub scale_min: f64,
    pub scale_max: f64,
    pub scale_steps: usize,
    pub ssim_threshold: f64,
    /// Maximum offset grid radius searched around (0, 0), in pixels
    /// (: "a small 2-D grid of offsets (at most 5x5, step 1px)").
    pub max_offset: i32,
    /// Worker-pool chunksize.
    pub chunksize: usize,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            scale_min: 0.6,
            scale_max: 0.7,
            scale_steps: 11,
            ssim_threshold: 0.75,
            max_offset: 2,
            chunksize: 10,
        }
    }
}

impl OverlayOptions {
    /// `scale_steps` evenly spaced values in `[scale_min, scale_max]`,
    /// matching `numpy.linspace(0.6, 0.7, 11)`.
    pub fn scales(&self) -> Vec<f64> {
        if self.scale_steps <= 1 {
            return vec![self.scale_min];
        }
        let step = (self.scale_max - self.scale_min) / (self.scale_steps - 1) as f64;
        (0..self.scale_steps).map(|i| self.scale_min + step * i as f64).collect()
    }

    /// Offsets searched at each scale: a `(2*max_offset+1)^2` grid
    /// centered on `(0, 0)`, capped at 5x5.
    pub fn offsets(&self) -> Vec<(i32, i32)> {
        let radius = self.max_offset.min(2);
        let mut offsets = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                offsets.push((dx, dy));
            }
        }
        offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_are_evenly_spaced_over_the_configured_range() {
        let opts = OverlayOptions::default();
        let scales = opts.scales();
        assert_eq!(scales.len(), 11);
        assert!((scales[0] - 0.6).abs() < 1e-9);
        assert!((scales[10] - 0.7).abs() < 1e-9);
    }

    #[test]
    fn offsets_form_a_5x5_grid_by_default() {
        let opts = OverlayOptions::default();
        assert_eq!(opts.offsets().len(), 25);
    }
}
