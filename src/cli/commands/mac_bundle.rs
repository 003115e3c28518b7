//! `mac-bundle` command implementation.

use super::{load_settings, require_executable};
use crate::bundler::{Bundler, PackageType};
use crate::cli::RuntimeConfig;
use crate::error::Result;
use std::path::Path;

/// Execute mac-bundle command
pub(super) async fn execute_mac_bundle(
    config: &RuntimeConfig,
    config_path: Option<&Path>,
    binary: &Path,
    out_dir: Option<&Path>,
    resources: Option<&Path>,
    rewrite_paths: bool,
) -> Result<i32> {
    require_executable(binary)?;

    let mut builder = load_settings(config_path, out_dir)?;
    if let Some(dir) = resources {
        builder = builder.resource_dir(dir);
    }
    let settings = builder.build()?;

    config.println(&format!("📦 Bundling {} as a macOS app...", binary.display()));
    if !rewrite_paths {
        config.verbose_println("Load paths are left untouched (--no-rewrite)");
    }

    let bundler = Bundler::new(settings).rewrite_paths(rewrite_paths);
    let artifact = bundler.bundle(PackageType::MacOsBundle, binary).await?;

    for path in &artifact.paths {
        config.success_println(&format!("Created {}", path.display()));
    }
    config.verbose_println(&format!("Size: {} bytes", artifact.size));
    config.verbose_println(&format!("SHA256: {}", artifact.checksum));

    Ok(0)
}
