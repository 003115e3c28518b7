//! Error types for chesto_packager operations.
//!
//! This module defines the top-level error with actionable messages and
//! recovery suggestions. Packaging failures come from
//! [`crate::bundler::Error`]; configuration and argument failures are
//! defined here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for chesto_packager operations
pub type Result<T> = std::result::Result<T, PackagerError>;

/// Main error type for all chesto_packager operations
#[derive(Error, Debug)]
pub enum PackagerError {
    /// Packaging errors (tool failures, copies, plist)
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),

    /// Configuration loading errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Explicitly requested config file does not exist
    #[error("Config file not found: {path}")]
    NotFound {
        /// Path given with `--config`
        path: PathBuf,
    },

    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has unknown keys
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        /// Config file path
        path: PathBuf,
        /// TOML error
        #[source]
        source: toml::de::Error,
    },

    /// Config file parsed but holds unusable values
    #[error("Invalid configuration in {path}: {reason}")]
    Invalid {
        /// Config file path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Input executable does not exist
    #[error("Executable not found: {path}")]
    MissingExecutable {
        /// Path given on the command line
        path: PathBuf,
    },
}

impl PackagerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PackagerError::Bundler(err) => match err.tool() {
                Some(tool) => tool_suggestions(tool, err),
                None => vec!["Check the error message above for specific details".to_string()],
            },
            PackagerError::Config(ConfigError::NotFound { path }) => vec![
                format!("Create {} or drop the --config option", path.display()),
            ],
            PackagerError::Config(ConfigError::Parse { .. }) => vec![
                "Valid sections are [tools], [macos], [windows] and [pkg_config]".to_string(),
                "Remove keys the packager does not know about".to_string(),
            ],
            PackagerError::Cli(CliError::MissingExecutable { .. }) => vec![
                "Build the executable first, then run the packager from its directory"
                    .to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

fn tool_suggestions(tool: &str, err: &crate::bundler::Error) -> Vec<String> {
    let not_found = matches!(root_cause(err), crate::bundler::Error::ToolNotFound { .. });
    let timed_out = matches!(root_cause(err), crate::bundler::Error::Timeout { .. });

    let base = tool.rsplit(['/', '\\']).next().unwrap_or(tool);
    let mut suggestions = match base {
        "otool" | "install_name_tool" if not_found => vec![
            "Install the Xcode Command Line Tools: xcode-select --install".to_string(),
        ],
        "ldd" if not_found => vec![
            "Run from an MSYS2 MinGW shell so ldd is on PATH".to_string(),
        ],
        "pkg-config" if not_found => vec![
            "Install pkg-config: pacman -S mingw-w64-x86_64-pkg-config".to_string(),
        ],
        "pkg-config" => vec![
            "Check that the .pc files exist under the --with-path directory".to_string(),
            "Install the missing libraries through the MSYS2 package manager".to_string(),
        ],
        "install_name_tool" => vec![
            "Make sure the executable is writable and not code-signed".to_string(),
        ],
        _ => Vec::new(),
    };

    if not_found {
        suggestions.push(format!(
            "Or point [tools] at the {} binary in chesto_packager.toml",
            base
        ));
    }
    if timed_out {
        suggestions.push("Raise tools.timeout_secs in chesto_packager.toml".to_string());
    }
    if suggestions.is_empty() {
        suggestions.push(format!("Run `{}` by hand to see its full output", base));
    }
    suggestions
}

fn root_cause(err: &crate::bundler::Error) -> &crate::bundler::Error {
    match err {
        crate::bundler::Error::Context(_, inner) => root_cause(inner),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{Context, Error};

    #[test]
    fn test_missing_otool_suggests_xcode() {
        let err: crate::bundler::Result<()> = Err(Error::ToolNotFound {
            tool: "otool".into(),
        });
        let err = PackagerError::from(err.context("failed to list dependencies").unwrap_err());

        let suggestions = err.recovery_suggestions();
        assert!(suggestions[0].contains("Xcode Command Line Tools"));
    }

    #[test]
    fn test_missing_ldd_suggests_msys2() {
        let err = PackagerError::Bundler(Error::ToolNotFound { tool: "ldd".into() });
        assert!(err.recovery_suggestions()[0].contains("MSYS2"));
    }

    #[test]
    fn test_pkg_config_failure_suggests_search_path() {
        let err = PackagerError::Bundler(Error::CommandStatus {
            command: "pkg-config --libs --static sdl2".into(),
            code: Some(1),
            stderr: "Package sdl2 was not found".into(),
        });
        assert!(err.recovery_suggestions()[0].contains(".pc files"));
    }

    #[test]
    fn test_timeout_suggests_raising_limit() {
        let err = PackagerError::Bundler(Error::Timeout {
            command: "/usr/bin/otool -L tool".into(),
            seconds: 120,
        });
        assert!(
            err.recovery_suggestions()
                .iter()
                .any(|s| s.contains("timeout_secs"))
        );
    }

    #[test]
    fn test_generic_fallback() {
        let err = PackagerError::Io(std::io::Error::other("disk full"));
        assert_eq!(err.recovery_suggestions().len(), 1);
    }
}
