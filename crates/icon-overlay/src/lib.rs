//! Rarity overlay detection: barcode-stripe comparison, hue-band gating,
//! and multi-scale SSIM scoring against a slot's icon ROI.

pub mod barcode;
pub mod error;
pub mod hue;
pub mod options;
pub mod stage;

pub use error::OverlayError;
pub use hue::classify_overlay_by_patch;
pub use options::OverlayOptions;
pub use stage::run;
