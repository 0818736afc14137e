//! Stage error for the icon matcher.

#[derive(Debug, thiserror::Error)]
pub enum IconMatchError {
    #[error("failed to load catalog icon '{file_path}': {reason}")]
    IconLoadFailed { file_path: String, reason: String },
}
