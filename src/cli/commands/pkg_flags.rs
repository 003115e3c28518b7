//! `pkg-flags` command implementation.
//!
//! The flags line is the command's only stdout output in quiet mode, so it
//! can be captured with `$(chesto_packager -q pkg-flags)`.

use super::load_settings;
use crate::bundler::{FlagQuery, resolve_flags};
use crate::cli::RuntimeConfig;
use crate::error::Result;
use std::io::Write;
use std::path::Path;

/// Execute pkg-flags command
pub(super) async fn execute_pkg_flags(
    config: &RuntimeConfig,
    config_path: Option<&Path>,
    cflags: bool,
    search_path: Option<String>,
    libraries: Vec<String>,
) -> Result<i32> {
    let settings = load_settings(config_path, None)?.build()?;

    let query = FlagQuery {
        libraries,
        search_path,
        cflags,
    };
    let flags = resolve_flags(&settings, &query).await?;

    config.verbose_println(&format!("{} flags", flags.split_whitespace().count()));
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{flags}")?;

    Ok(0)
}
