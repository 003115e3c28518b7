//! Load-path rewriting with `install_name_tool`.
//!
//! Each bundled dylib is recorded in the executable by its absolute install
//! path. Rewriting those entries to `@executable_path/<name>` lets dyld find
//! the copies sitting next to the executable in `Contents/MacOS`, wherever
//! the `.app` ends up.

use crate::bundler::{
    deps::LibraryRef,
    error::{Context, Result},
    settings::Settings,
    tools::ToolCommand,
};
use std::path::Path;

/// Replacement load path for `lib`, e.g. `@executable_path/libSDL2.dylib`.
pub fn relative_load_path(token: &str, lib: &LibraryRef) -> String {
    format!("{}/{}", token.trim_end_matches('/'), lib.name())
}

/// Builds the `install_name_tool -change` invocation for one library.
pub fn change_command(settings: &Settings, lib: &LibraryRef, executable: &Path) -> ToolCommand {
    ToolCommand::new(&settings.tools().install_name_tool)
        .arg("-change")
        .arg(lib.source())
        .arg(relative_load_path(&settings.macos().executable_token, lib))
        .arg(executable)
}

/// Rewrites every library reference of `executable` in place.
///
/// Runs once per entry in `libs`, in order, before anything is copied.
/// Returns the number of rewrites performed.
///
/// # Errors
///
/// Stops at the first `install_name_tool` failure.
pub async fn rewrite_load_paths(
    executable: &Path,
    libs: &[LibraryRef],
    settings: &Settings,
) -> Result<usize> {
    for lib in libs {
        let command = change_command(settings, lib, executable);
        command
            .run(settings.tools().timeout())
            .await
            .with_context(|| format!("failed to rewrite load path of {}", lib.source()))?;
        log::info!(
            "Rewrote {} -> {}",
            lib.source(),
            relative_load_path(&settings.macos().executable_token, lib)
        );
    }
    Ok(libs.len())
}
