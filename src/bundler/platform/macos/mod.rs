//! macOS bundling support for .app bundles.
//!
//! # Pipeline
//!
//! 1. `otool -L` lists the executable's dylibs; only those under the
//!    configured install prefix (default `/opt/`) are kept
//! 2. [`rewrite`] points each kept entry at `@executable_path/<name>`
//! 3. [`app`] copies the executable, the dylibs, the resource directory and
//!    an `Info.plist` into `<id>.app`
//!
//! # Build Requirements
//!
//! | Step | Required Tools | Notes |
//! |------|----------------|-------|
//! | Discovery | `otool` | Xcode Command Line Tools |
//! | Rewrite | `install_name_tool` | Xcode Command Line Tools |
//!
//! # Output Location
//!
//! `<out-dir>/<id>.app`, where `<id>` is the executable name up to its
//! first `.`.

pub mod app;
pub mod rewrite;
