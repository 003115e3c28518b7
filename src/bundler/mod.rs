//! Dependency-bundling for SDL-style desktop binaries.
//!
//! This module turns a freshly linked executable into something that runs on
//! a machine without the build toolchain:
//!
//! | Platform | Output | Notes |
//! |----------|--------|-------|
//! | macOS | `<id>.app` | dylibs under `/opt/` copied, load paths rewritten to `@executable_path` |
//! | Windows | `<id>.exe` + DLLs | non-system DLLs from `ldd` copied flat |
//!
//! plus a `pkg-config` front end ([`resolve_flags`]) that prints a
//! de-duplicated static link line.
//!
//! All external tools (`otool`, `install_name_tool`, `ldd`, `pkg-config`)
//! are run with explicit argument vectors through [`ToolCommand`]; a tool
//! that is missing, fails, or hangs past its timeout stops the run.
//!
//! # Example
//!
//! ```no_run
//! use chesto_packager::bundler::{Bundler, PackageType, SettingsBuilder};
//! use std::path::Path;
//!
//! # async fn example() -> chesto_packager::bundler::Result<()> {
//! let settings = SettingsBuilder::new().out_directory(".").build()?;
//!
//! let bundler = Bundler::new(settings);
//! let artifact = bundler
//!     .bundle(PackageType::WindowsDlls, Path::new("appstore.bin"))
//!     .await?;
//! println!("{} files", artifact.paths.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod builder;
pub mod deps;
mod error;
mod guard;
pub mod inspect;
pub mod pkg_config;
pub mod platform;
mod settings;
pub mod tools;
mod utils;

// Public re-exports
pub use builder::Bundler;
pub use deps::{LibraryRef, Platform, PrefixRule};
pub use error::{Context, Error, ErrorExt, Result};
pub use guard::BundleGuard;
pub use inspect::BinaryFormat;
pub use pkg_config::{FlagQuery, resolve_flags};
pub use platform::PackageType;
pub use settings::{
    MacOsSettings, PkgConfigSettings, Settings, SettingsBuilder, ToolSettings, WindowsSettings,
};
pub use tools::{ToolCommand, ToolOutput};

/// Result of one packaging run.
///
/// # Fields
///
/// - `package_type`: what was produced (`app` or `dlls`)
/// - `paths`: every file or directory written; the primary artifact first
/// - `size`: total bytes written across `paths`
/// - `checksum`: SHA-256 of the primary artifact
///
/// # Examples
///
/// ```no_run
/// use chesto_packager::bundler::{Bundler, PackageType, SettingsBuilder};
/// use std::path::Path;
///
/// # async fn example() -> chesto_packager::bundler::Result<()> {
/// let bundler = Bundler::new(SettingsBuilder::new().build()?);
/// let artifact = bundler
///     .bundle(PackageType::MacOsBundle, Path::new("appstore.bin"))
///     .await?;
///
/// println!("Created {}: {} bytes", artifact.package_type, artifact.size);
/// println!("SHA256: {}", artifact.checksum);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BundledArtifact {
    /// The package type that was created.
    pub package_type: PackageType,

    /// Paths written by this run.
    ///
    /// For a macOS bundle this is the `.app` directory alone. For a Windows
    /// copy it is the `.exe` followed by each DLL, in discovery order.
    pub paths: Vec<std::path::PathBuf>,

    /// Total size in bytes of everything in `paths`.
    pub size: u64,

    /// SHA-256 checksum of the primary artifact.
    ///
    /// Directories are hashed over their sorted file list, so rebuilding an
    /// identical `.app` yields the same value.
    pub checksum: String,
}
