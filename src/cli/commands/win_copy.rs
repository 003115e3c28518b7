//! `win-copy` command implementation.

use super::{load_settings, require_executable};
use crate::bundler::{Bundler, PackageType};
use crate::cli::RuntimeConfig;
use crate::error::Result;
use std::path::Path;

/// Execute win-copy command
pub(super) async fn execute_win_copy(
    config: &RuntimeConfig,
    config_path: Option<&Path>,
    binary: &Path,
    out_dir: Option<&Path>,
) -> Result<i32> {
    require_executable(binary)?;

    let settings = load_settings(config_path, out_dir)?.build()?;
    let target = settings.out_directory().to_path_buf();

    config.verbose_println(&format!("Listing DLLs of {}", binary.display()));

    let bundler = Bundler::new(settings);
    let artifact = bundler.bundle(PackageType::WindowsDlls, binary).await?;

    // paths[0] is the renamed executable
    let dll_count = artifact.paths.len().saturating_sub(1);
    for path in artifact.paths.iter().skip(1) {
        config.verbose_println(&format!("Copied {}", path.display()));
    }

    config.success_println(&format!(
        "Done! Copied {} DLLs to {}.",
        dll_count,
        target.display()
    ));

    Ok(0)
}
