//! Stage error for the prefilter.

#[derive(Debug, thiserror::Error)]
pub enum PrefilterError {
    #[error("hash prefilter failed for icon group '{group}' at slot {slot}: {reason}")]
    HashQueryFailed { group: String, slot: u32, reason: String },
}
