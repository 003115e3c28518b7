//! # Chesto Packager
//!
//! Ships SDL desktop binaries together with the shared libraries they were
//! linked against.
//!
//! ## Features
//!
//! - **macOS bundles**: copies every dylib under `/opt/` into `<id>.app`,
//!   rewrites the executable's load paths to `@executable_path` and writes a
//!   minimal `Info.plist`
//! - **Windows folders**: copies the non-system DLLs `ldd` reports next to an
//!   `.exe` copy of the binary
//! - **Link flags**: prints `pkg-config --static` output with repeated flags
//!   removed
//!
//! ## Usage
//!
//! ```bash
//! chesto_packager mac-bundle appstore.bin
//! chesto_packager win-copy appstore.bin
//! chesto_packager -q pkg-flags sdl2 sdl2_image
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;

// Re-export main types for public API
pub use bundler::{BundledArtifact, Bundler, PackageType, Settings, SettingsBuilder};
pub use cli::Args;
pub use error::{CliError, ConfigError, PackagerError, Result};
