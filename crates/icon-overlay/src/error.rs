//! Stage error for the overlay detector.

#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("overlay detection failed for icon group '{group}' at slot {slot}: {reason}")]
    DetectionFailed { group: String, slot: u32, reason: String },
}
