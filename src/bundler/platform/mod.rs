//! Platform-specific packaging implementations.
//!
//! # Supported Platforms
//!
//! | Platform | Package Type | Module |
//! |----------|--------------|--------|
//! | macOS | `.app` bundle with relative dylib paths | [`macos`] |
//! | Windows | flat DLL copy + renamed `.exe` | [`windows`] |
//!
//! Both modules run on any host; only the external tools they call are
//! platform-specific.

pub mod macos;
pub mod windows;

use crate::bundler::deps::Platform;
use std::fmt;

/// Supported package types.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum PackageType {
    /// macOS application bundle (.app).
    ///
    /// Dylibs under the install prefix are rewritten to `@executable_path`
    /// and copied into `Contents/MacOS`.
    MacOsBundle,

    /// Windows DLLs copied next to an `.exe` copy of the executable.
    WindowsDlls,
}

impl PackageType {
    /// Returns the short name for this package type.
    ///
    /// This is the lowercase identifier used in CLI output.
    pub fn short_name(&self) -> &'static str {
        match self {
            PackageType::MacOsBundle => "app",
            PackageType::WindowsDlls => "dlls",
        }
    }

    /// Platform whose tools and filtering rules this package type uses.
    pub fn platform(&self) -> Platform {
        match self {
            PackageType::MacOsBundle => Platform::MacOs,
            PackageType::WindowsDlls => Platform::Windows,
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Derives the short identifier from an executable file name.
///
/// Everything from the first `.` on is dropped, so `tool.bin` becomes
/// `tool` and `my.tool.bin` becomes `my`, not `my.tool`.
pub fn short_identifier(executable_name: &str) -> &str {
    executable_name
        .split_once('.')
        .map_or(executable_name, |(head, _)| head)
}
