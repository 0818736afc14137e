//! The `sister.toml` schema: one table per stage's tunables, every field
//! defaulted so an absent file (or an absent table within one) behaves
//! exactly like the built-in constants each stage falls back to.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub icon_dir: String,
    pub overlay_dir: String,
    pub output_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            icon_dir: "icons".to_string(),
            overlay_dir: "overlays".to_string(),
            output_dir: ".".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

/// Screenshot downscale bound.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    pub enabled: bool,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self { enabled: true, max_width: 1920, max_height: 1080 }
    }
}

/// Hash-index build/query tunables.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    pub match_width: u32,
    pub match_height: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self { match_width: 16, match_height: 16 }
    }
}

/// Prefilter tunables.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PrefilterConfig {
    pub phash_radius: u32,
    pub dhash_radius: u32,
    pub max_allowed_gap: u32,
    pub max_next_ranks: u32,
    pub chunksize: usize,
}

impl Default for PrefilterConfig {
    fn default() -> Self {
        Self { phash_radius: 18, dhash_radius: 10, max_allowed_gap: 6, max_next_ranks: 2, chunksize: 10 }
    }
}

/// Overlay (rarity) detector tunables.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub scale_min: f64,
    pub scale_max: f64,
    pub scale_steps: usize,
    pub ssim_threshold: f64,
    pub max_offset: i32,
    pub chunksize: usize,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self { scale_min: 0.6, scale_max: 0.7, scale_steps: 11, ssim_threshold: 0.75, max_offset: 2, chunksize: 10 }
    }
}

/// Icon matcher tunables.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub ssim_threshold: f64,
    pub ref_width: u32,
    pub ref_height: u32,
    pub chunksize: usize,
    pub common_branch_requires_threshold: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            ssim_threshold: 0.7,
            ref_width: 47,
            ref_height: 36,
            chunksize: 10,
            common_branch_requires_threshold: false,
        }
    }
}

/// Top-level `sister.toml` document. Every table is optional and every
/// field within it defaults, so `toml::from_str("")` yields the same
/// values as each stage's hardcoded defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
    pub resize: ResizeConfig,
    pub hash: HashConfig,
    pub prefilter: PrefilterConfig,
    pub overlay: OverlayConfig,
    pub matcher: MatcherConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_all_defaults() {
        let file: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(file.prefilter.phash_radius, 18);
        assert_eq!(file.overlay.ssim_threshold, 0.75);
        assert_eq!(file.matcher.ref_width, 47);
    }

    #[test]
    fn partial_table_keeps_sibling_defaults() {
        let file: ConfigFile = toml::from_str("[prefilter]\nphash_radius = 24\n").unwrap();
        assert_eq!(file.prefilter.phash_radius, 24);
        assert_eq!(file.prefilter.dhash_radius, 10);
    }
}
