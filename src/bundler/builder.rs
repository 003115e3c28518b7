//! Bundle orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that dispatches to
//! the platform modules and describes what they produced.
//!
//! # Overview
//!
//! The bundler:
//! 1. Reads configuration from [`Settings`]
//! 2. Delegates to the platform module for the requested [`PackageType`]
//! 3. Calculates sizes and checksums
//! 4. Returns a [`BundledArtifact`]
//!
//! # Example
//!
//! ```no_run
//! use chesto_packager::bundler::{Bundler, PackageType, SettingsBuilder};
//! use std::path::Path;
//!
//! # async fn example() -> chesto_packager::bundler::Result<()> {
//! let settings = SettingsBuilder::new().out_directory("dist").build()?;
//! let bundler = Bundler::new(settings);
//! let artifact = bundler
//!     .bundle(PackageType::MacOsBundle, Path::new("appstore.bin"))
//!     .await?;
//!
//! println!("Created: {} ({} bytes)", artifact.package_type, artifact.size);
//! println!("SHA256: {}", artifact.checksum);
//! # Ok(())
//! # }
//! ```

use crate::bail;
use crate::bundler::{
    BundledArtifact, PackageType, Result, Settings,
    error::ErrorExt,
    platform::{macos, windows},
};
use std::path::Path;

/// Main bundler orchestrator.
#[derive(Debug)]
pub struct Bundler {
    settings: Settings,
    rewrite_paths: bool,
}

impl Bundler {
    /// Creates a new bundler with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            rewrite_paths: true,
        }
    }

    /// Controls whether macOS load paths are rewritten before bundling.
    ///
    /// Default: true. Disable when the executable was already patched by a
    /// previous run.
    pub fn rewrite_paths(mut self, enabled: bool) -> Self {
        self.rewrite_paths = enabled;
        self
    }

    /// Packages `executable` as `package_type`.
    ///
    /// # Errors
    ///
    /// Returns the first failing step: dependency listing, load path
    /// rewrite, or any copy.
    pub async fn bundle(
        &self,
        package_type: PackageType,
        executable: &Path,
    ) -> Result<BundledArtifact> {
        log::info!(
            "Packaging {} as {}",
            executable.display(),
            package_type.short_name()
        );

        let paths = match package_type {
            PackageType::MacOsBundle => {
                macos::app::bundle_project(executable, &self.settings, self.rewrite_paths).await?
            }
            PackageType::WindowsDlls => {
                windows::dlls::bundle_project(executable, &self.settings).await?
            }
        };

        let Some(primary) = paths.first() else {
            bail!(
                "Platform bundler for {:?} returned no paths - this indicates a bundler bug",
                package_type
            );
        };
        let checksum = calculate_sha256(primary).await?;

        let mut size = 0u64;
        for p in &paths {
            size += path_size(p)?;
        }

        Ok(BundledArtifact {
            package_type,
            paths,
            size,
            checksum,
        })
    }
}

/// Total size in bytes of a file, or of every file below a directory.
fn path_size(path: &Path) -> Result<u64> {
    let metadata = std::fs::metadata(path).fs_context("reading artifact metadata", path)?;
    if metadata.is_file() {
        return Ok(metadata.len());
    }

    let mut total = 0u64;
    for entry in walkdir::WalkDir::new(path).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() {
            total += entry
                .metadata()
                .map_err(crate::bundler::Error::WalkdirError)?
                .len();
        }
    }
    Ok(total)
}

/// Calculates SHA256 checksum of a file or directory.
///
/// For files: Reads in 8KB chunks and computes the SHA-256 hash.
/// For directories: Recursively hashes all files in deterministic order.
async fn calculate_sha256(path: &Path) -> Result<String> {
    use sha2::{Digest, Sha256};
    use tokio::io::AsyncReadExt;

    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?;

    if metadata.is_file() {
        let mut file = tokio::fs::File::open(path)
            .await
            .fs_context("opening file for hashing", path)?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; 8192];

        loop {
            let n = file
                .read(&mut buffer)
                .await
                .fs_context("reading file for hash calculation", path)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    } else if metadata.is_dir() {
        calculate_directory_sha256(path).await
    } else {
        bail!("Path is neither file nor directory: {}", path.display())
    }
}

/// Calculates SHA256 checksum of a directory tree.
///
/// Each file contributes its relative path followed by its content, in
/// sorted path order, so the same `.app` always hashes the same.
async fn calculate_directory_sha256(dir_path: &Path) -> Result<String> {
    use sha2::{Digest, Sha256};
    use tokio::io::AsyncReadExt;

    let mut entries = Vec::new();
    for entry in walkdir::WalkDir::new(dir_path).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() {
            entries.push(entry);
        }
    }

    entries.sort_by_key(|e| e.path().to_path_buf());

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    for entry in entries {
        let rel_path = entry.path().strip_prefix(dir_path)?;
        hasher.update(rel_path.to_string_lossy().as_bytes());

        let mut file = tokio::fs::File::open(entry.path())
            .await
            .fs_context("opening file for hashing", entry.path())?;

        loop {
            let n = file
                .read(&mut buffer)
                .await
                .fs_context("reading file for hash calculation", entry.path())?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_checksum_is_sha256() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("empty");
        std::fs::write(&file, b"").unwrap();

        assert_eq!(
            calculate_sha256(&file).await.unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[tokio::test]
    async fn test_directory_checksum_is_deterministic() {
        let temp = TempDir::new().unwrap();
        let make = |name: &str| {
            let dir = temp.path().join(name);
            std::fs::create_dir_all(dir.join("Contents/MacOS")).unwrap();
            std::fs::write(dir.join("Contents/MacOS/tool"), b"exe").unwrap();
            std::fs::write(dir.join("Contents/Info.plist"), b"plist").unwrap();
            dir
        };
        let a = make("a.app");
        let b = make("b.app");

        let sum_a = calculate_sha256(&a).await.unwrap();
        assert_eq!(sum_a, calculate_sha256(&b).await.unwrap());

        std::fs::write(b.join("Contents/MacOS/tool"), b"patched").unwrap();
        assert_ne!(sum_a, calculate_sha256(&b).await.unwrap());
    }

    #[tokio::test]
    async fn test_directory_checksum_reports_walk_errors() {
        let temp = TempDir::new().unwrap();
        let err = calculate_directory_sha256(&temp.path().join("gone.app"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::bundler::Error::WalkdirError(_)));
    }

    #[test]
    fn test_path_size_sums_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("x/y")).unwrap();
        std::fs::write(temp.path().join("x/a"), b"1234").unwrap();
        std::fs::write(temp.path().join("x/y/b"), b"56").unwrap();

        assert_eq!(path_size(&temp.path().join("x")).unwrap(), 6);
        assert_eq!(path_size(&temp.path().join("x/a")).unwrap(), 4);
    }
}
