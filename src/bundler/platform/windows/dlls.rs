//! Flat DLL copying for MSYS2 builds.
//!
//! Windows looks for DLLs in the executable's own directory first, so the
//! non-system DLLs reported by `ldd` are copied next to the executable and
//! the `.bin` build output is duplicated as `<id>.exe`. No load paths are
//! rewritten.

use crate::bundler::{
    deps::{self, LibraryRef, Platform},
    error::{Context, Error, ErrorExt, Result},
    inspect,
    platform::short_identifier,
    settings::Settings,
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Outcome of a flat copy.
#[derive(Debug, Clone)]
pub struct CopiedDlls {
    /// Destination of every copied DLL, in discovery order.
    pub dlls: Vec<PathBuf>,
    /// The renamed executable, `<out>/<id>.exe`.
    pub executable: PathBuf,
}

/// Copies `executable`'s DLLs and an `.exe` copy of it into the output directory.
///
/// Returns the `.exe` first, followed by each copied DLL.
pub async fn bundle_project(executable: &Path, settings: &Settings) -> Result<Vec<PathBuf>> {
    let copied = copy_dependencies(executable, settings).await?;
    let mut paths = vec![copied.executable];
    paths.extend(copied.dlls);
    Ok(paths)
}

/// Discovers and copies the DLLs, then writes the renamed executable.
pub async fn copy_dependencies(executable: &Path, settings: &Settings) -> Result<CopiedDlls> {
    inspect::check_executable(executable, Platform::Windows).await?;

    let libs = deps::discover_dependencies(Platform::Windows, executable, settings).await?;
    let out_dir = settings.out_directory();

    tokio::fs::create_dir_all(out_dir)
        .await
        .fs_context("creating output directory", out_dir)?;

    let dlls = copy_dlls(&libs, out_dir).await?;
    let exe = copy_renamed_executable(executable, out_dir).await?;

    Ok(CopiedDlls {
        dlls,
        executable: exe,
    })
}

async fn copy_dlls(libs: &[LibraryRef], out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::with_capacity(libs.len());
    for lib in libs {
        let dst = out_dir.join(lib.name());
        if fs::same_file(Path::new(lib.source()), &dst).await? {
            log::debug!("{} is already in place", lib.name());
            copied.push(dst);
            continue;
        }
        fs::copy_file(Path::new(lib.source()), &dst)
            .await
            .with_context(|| format!("failed to copy DLL {}", lib.source()))?;
        log::debug!("Copied {}", lib.name());
        copied.push(dst);
    }
    Ok(copied)
}

/// Path of the `.exe` copy, e.g. `appstore.bin` -> `<out>/appstore.exe`.
pub fn exe_destination(executable: &Path, out_dir: &Path) -> Result<PathBuf> {
    let name = executable
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("invalid executable path: {}", executable.display()))?;
    let identifier = short_identifier(name);
    if identifier.is_empty() {
        return Err(Error::GenericError(format!(
            "cannot derive an executable name from {name:?}"
        )));
    }
    Ok(out_dir.join(format!("{identifier}.exe")))
}

async fn copy_renamed_executable(executable: &Path, out_dir: &Path) -> Result<PathBuf> {
    let dst = exe_destination(executable, out_dir)?;
    if fs::same_file(executable, &dst).await? {
        log::debug!("{} already has its final name", dst.display());
        return Ok(dst);
    }
    fs::copy_file(executable, &dst)
        .await
        .with_context(|| format!("failed to copy {} to {}", executable.display(), dst.display()))?;
    log::info!("Copied {} to {}", executable.display(), dst.display());
    Ok(dst)
}
