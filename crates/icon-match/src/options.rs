//! Matcher tunables.

/// Slot ROI and catalog icons are normalized to this size before matching,
/// the same reference frame the overlay detector uses.
pub const REFERENCE_WIDTH: u32 = 47;
pub const REFERENCE_HEIGHT: u32 = 36;

/// Centering anchor for an overlay detector `(dx, dy)` offset hint: the
/// hinted window's top-left is placed at `(anchor + dx, anchor + dy)`,
/// matching the convention `icon-overlay`'s stage search grid uses.
pub const HINT_ANCHOR: i32 = 2;

#[derive(Debug, Clone, Copy)]
pub struct MatcherOptions {
    pub scale_min: f64,
    pub scale_max: f64,
    pub scale_steps: usize,
    pub ssim_threshold: f64,
    /// Worker-pool chunksize.
    pub chunksize: usize,
    /// Whether the matcher's "common" branch must still clear
    /// `ssim_threshold` before reporting a best-of-six overlay guess.
    /// Defaults to `false` (best-of-six always reports something).
    pub common_branch_requires_threshold: bool,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            scale_min: 0.6,
            scale_max: 0.7,
            scale_steps: 11,
            ssim_threshold: 0.7,
            chunksize: 10,
            common_branch_requires_threshold: false,
        }
    }
}

impl MatcherOptions {
    /// The full, unhinted scale schedule (`numpy.linspace(0.6, 0.7, 11)`).
    pub fn scales(&self) -> Vec<f64> {
        if self.scale_steps <= 1 {
            return vec![self.scale_min];
        }
        let step = (self.scale_max - self.scale_min) / (self.scale_steps - 1) as f64;
        (0..self.scale_steps).map(|i| self.scale_min + step * i as f64).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_span_the_configured_range() {
        let opts = MatcherOptions::default();
        let scales = opts.scales();
        assert_eq!(scales.len(), 11);
        assert!((scales[0] - 0.6).abs() < 1e-9);
        assert!((scales[10] - 0.7).abs() < 1e-9);
    }
}
