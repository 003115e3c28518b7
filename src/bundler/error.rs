//! Error types for bundler operations.
//!
//! Every external tool invocation and file-system step reports failure
//! through [`Error`], so a packaging run stops at the first broken step
//! instead of carrying on with empty or partial data.
//!
//! # Features
//!
//! - **Context trait**: Add context to errors similar to anyhow
//! - **ErrorExt trait**: Filesystem operations with automatic path context
//! - **bail! macro**: Early return with formatted error messages
//!
//! # Example
//!
//! ```no_run
//! use chesto_packager::bundler::{Context, ErrorExt, Result};
//! use std::path::Path;
//!
//! fn read_listing(path: &Path) -> Result<String> {
//!     let text = std::fs::read_to_string(path)
//!         .fs_context("reading tool listing", path)?;
//!     text.lines()
//!         .next()
//!         .map(str::to_owned)
//!         .context("listing is empty")
//! }
//! ```

use std::{
    fmt::Display,
    io,
    path::{self, PathBuf},
};
use thiserror::Error as DeriveError;

/// Errors returned by the bundler.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "copying library")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// The external command could not be spawned or awaited.
    #[error("failed to run command {command}: {error}")]
    CommandFailed {
        /// Command line that failed to execute
        command: String,
        /// The underlying error
        error: io::Error,
    },

    /// The external command ran but exited unsuccessfully.
    #[error("command {command} exited with {}: {stderr}", code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}")))]
    CommandStatus {
        /// Command line that failed
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// A required external tool is not installed or not on `PATH`.
    #[error("required tool `{tool}` was not found")]
    ToolNotFound {
        /// Tool name or path as configured
        tool: String,
    },

    /// The external command did not finish within the configured timeout.
    #[error("command {command} timed out after {seconds}s")]
    Timeout {
        /// Command line that hung
        command: String,
        /// Timeout that elapsed
        seconds: u64,
    },

    /// Error walking directory (resource copying, checksums).
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripError(#[from] path::StripPrefixError),

    /// Property list (plist) writing error.
    #[error("{0}")]
    Plist(#[from] plist::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Name of the external tool involved in this error, if any.
    ///
    /// Looks through [`Error::Context`] wrappers.
    pub fn tool(&self) -> Option<&str> {
        match self {
            Error::Context(_, inner) => inner.tool(),
            Error::ToolNotFound { tool } => Some(tool),
            Error::CommandFailed { command, .. }
            | Error::CommandStatus { command, .. }
            | Error::Timeout { command, .. } => command.split_whitespace().next(),
            _ => None,
        }
    }
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for adding context to errors.
///
/// Similar to `anyhow::Context` but integrated with bundler's Error type.
/// Works with both `Result<T, E>` and `Option<T>`.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "copying library".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Macro for early return with error.
///
/// Converts the message into a [`Error::GenericError`] and returns immediately.
///
/// ```ignore
/// bail!("operation failed");
/// bail!("invalid value: {}", value);
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError($msg.into()))
    };
    ($err:expr $(,)?) => {
        return Err($crate::bundler::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_inner_error() {
        let result: Result<()> = Err(Error::GenericError("boom".into()));
        let err = result.context("copying bundle").unwrap_err();
        assert_eq!(err.to_string(), "copying bundle: boom");
    }

    #[test]
    fn test_option_context_becomes_generic_error() {
        let err = None::<u8>.context("no main binary").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "no main binary"));
    }

    #[test]
    fn test_tool_is_found_through_context() {
        let err = Error::Context(
            "discovering dependencies".into(),
            Box::new(Error::CommandStatus {
                command: "otool -L app.bin".into(),
                code: Some(1),
                stderr: "no such file".into(),
            }),
        );
        assert_eq!(err.tool(), Some("otool"));
    }

    #[test]
    fn test_command_status_display_for_signal() {
        let err = Error::CommandStatus {
            command: "ldd app.bin".into(),
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("a signal"));
    }
}
