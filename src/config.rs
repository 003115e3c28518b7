//! Configuration file discovery and loading.
//!
//! Lookup order:
//!
//! 1. the file given with `--config` (must exist)
//! 2. `./chesto_packager.toml`
//! 3. `<config dir>/chesto_packager/config.toml` (e.g. `~/.config` on Linux)
//! 4. built-in defaults
//!
//! The file format is described on [`Settings`].

use crate::bundler::Settings;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Project-local config file name.
pub const CONFIG_FILE_NAME: &str = "chesto_packager.toml";

/// Finds the config file to use, if any.
///
/// An explicit path is returned as is, even when it does not exist, so that
/// [`load`] can report it.
pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("chesto_packager").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Loads settings following the lookup order.
///
/// # Errors
///
/// Fails if an explicit file is missing, or if the chosen file cannot be
/// read, parsed, or validated.
pub fn load(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    match locate(explicit) {
        Some(path) => load_file(&path),
        None => {
            log::debug!("No config file found, using defaults");
            Ok(Settings::default())
        }
    }
}

/// Loads settings from one TOML file.
pub fn load_file(path: &Path) -> Result<Settings, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Loading config from {}", path.display());
    from_toml_str(&text, path)
}

/// Parses and validates settings from TOML text.
///
/// `origin` only labels errors.
pub fn from_toml_str(text: &str, origin: &Path) -> Result<Settings, ConfigError> {
    let parsed: Settings = toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;

    parsed
        .into_builder()
        .build()
        .map_err(|e| ConfigError::Invalid {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = from_toml_str("", Path::new("empty.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let text = r#"
            [tools]
            otool = "/usr/bin/otool"

            [macos]
            install_prefix = "/opt/homebrew/"

            [pkg_config]
            libraries = ["zlib"]
        "#;
        let settings = from_toml_str(text, Path::new("t.toml")).unwrap();

        assert_eq!(settings.tools().otool, "/usr/bin/otool");
        assert_eq!(settings.tools().ldd, "ldd");
        assert_eq!(settings.macos().install_prefix, "/opt/homebrew/");
        assert_eq!(settings.macos().info_string, "Created by Chesto");
        assert_eq!(settings.pkg_config().libraries, vec!["zlib".to_string()]);
        assert_eq!(
            settings.pkg_config().search_path,
            "/c/MSYS2/mingw64/lib/pkgconfig/"
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = from_toml_str("[macos]\nicon = \"a.icns\"\n", Path::new("t.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let err = from_toml_str("[tools]\ntimeout_secs = 0\n", Path::new("t.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_missing_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.toml");
        let err = load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("c.toml");
        std::fs::write(&path, "[windows]\nsystem_prefix = \"/c/WINDOWS\"\n").unwrap();

        let settings = load(Some(&path)).unwrap();
        assert_eq!(settings.windows().system_prefix, "/c/WINDOWS");
    }
}
