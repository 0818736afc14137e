//! Loads `sister.toml` and exposes the stage-tunable defaults it carries.
//! Parsing only; wiring file values into each stage's own `*Options`
//! struct and applying CLI-flag precedence over them happens at the
//! binary boundary (`sister-cli`); this crate itself never depends on the
//! pipeline or model crates it ultimately configures.

pub mod error;
pub mod file;
pub mod options;

use std::path::{Path, PathBuf};

use tracing::debug;

pub use error::ConfigError;
pub use file::ConfigFile;
pub use options::resolve;

/// A loaded configuration: the parsed file (or its defaults if absent)
/// plus the raw source text, kept around in case a future stage wants to
/// re-derive something from it without re-reading the file.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,
    pub file: ConfigFile,
}

/// `sister.toml` in the current working directory, the conventional
/// place the CLI looks before falling back to built-in defaults.
pub fn discover() -> PathBuf {
    PathBuf::from("sister.toml")
}

/// Loads configuration from `path` (or the result of [`discover`] if
/// `None`). A missing file is not an error: it yields [`Config::default`],
/// since `sister.toml` is optional and every field already defaults.
pub fn load_from(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(discover);
    if !path.exists() {
        debug!(path = %path.display(), "no configuration file found, using built-in defaults");
        return Ok(Config::default());
    }
    load_file(&path)
}

fn load_file(path: &Path) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let file: ConfigFile = toml::from_str(&raw).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    debug!(path = %path.display(), "loaded configuration file");
    Ok(Config { raw: Some(raw), file })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_from(Some(PathBuf::from("__sister_nonexistent__.toml"))).unwrap();
        assert_eq!(config.file.prefilter.phash_radius, 18);
        assert!(config.raw.is_none());
    }

    #[test]
    fn loads_and_parses_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sister.toml");
        std::fs::write(&path, "[matcher]\nssim_threshold = 0.8\n").unwrap();
        let config = load_from(Some(path)).unwrap();
        assert_eq!(config.file.matcher.ssim_threshold, 0.8);
        assert!(config.raw.is_some());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sister.toml");
        std::fs::write(&path, "not valid toml [[[").unwrap();
        assert!(matches!(load_from(Some(path)), Err(ConfigError::Parse { .. })));
    }
}
