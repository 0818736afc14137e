//! Shared image-processing primitives used across the pipeline stages:
//! masking, resizing, alpha-blending, perceptual hashing (pHash/dHash),
//! SSIM, adaptive thresholding, and HSV conversion.

pub mod blend;
pub mod dhash;
pub mod gaussian;
pub mod mask;
pub mod phash;
pub mod resize;
pub mod ssim;
pub mod threshold;

pub use blend::alpha_blend;
pub use dhash::compute_dhash;
pub use gaussian::blur3x3;
pub use mask::apply_mask;
pub use phash::compute_phash;
pub use resize::{normalize_to_reference, resize_exact, resize_scaled};
pub use ssim::ssim;
pub use threshold::{adaptive_threshold_gaussian, image_to_hsv, rgb_to_hsv, Hsv};
