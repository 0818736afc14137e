//! CLI-flag > file > built-in-default precedence.
//!
//! Each `overlay_with` helper takes an `Option<T>` CLI override and
//! returns it if present, otherwise falling back to the value already
//! resolved from `sister.toml` (which itself defaulted from
//! [`crate::file::ConfigFile`]'s `Default` impls). Kept as a free
//! function rather than a trait since every field follows the same rule.

/// `cli.or(file_value)`, spelled out for readability at call sites that
/// chain several of these per config section.
pub fn resolve<T>(cli: Option<T>, file_value: T) -> T {
    cli.unwrap_or(file_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_override_wins_over_file_value() {
        assert_eq!(resolve(Some(5), 10), 5);
    }

    #[test]
    fn file_value_used_when_cli_is_absent() {
        assert_eq!(resolve(None, 10), 10);
    }
}
