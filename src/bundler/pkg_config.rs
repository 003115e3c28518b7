//! Linker flag resolution through `pkg-config`.
//!
//! `pkg-config --static` repeats flags shared by several libraries
//! (`-lm`, `-lws2_32`, ...). The flags are collapsed to one occurrence each,
//! keeping the position of the first, so the line can be pasted into a
//! Makefile as is.

use crate::bundler::{
    error::{Context, Result},
    settings::Settings,
    tools::ToolCommand,
};
use std::collections::HashSet;

/// What to ask `pkg-config` for.
#[derive(Clone, Debug, Default)]
pub struct FlagQuery {
    /// Libraries to query; empty means the configured set.
    pub libraries: Vec<String>,
    /// `.pc` search path override.
    pub search_path: Option<String>,
    /// Also request compiler flags (`--cflags`).
    pub cflags: bool,
}

/// Builds the `pkg-config` invocation for `query`.
pub fn flags_command(settings: &Settings, query: &FlagQuery) -> ToolCommand {
    let pkg = settings.pkg_config();
    let search_path = query.search_path.as_deref().unwrap_or(&pkg.search_path);
    let libraries = if query.libraries.is_empty() {
        &pkg.libraries
    } else {
        &query.libraries
    };

    let mut command = ToolCommand::new(&settings.tools().pkg_config).arg("--libs");
    if query.cflags {
        command = command.arg("--cflags");
    }
    command
        .arg("--static")
        .arg(format!("--with-path={search_path}"))
        .args(libraries)
}

/// Splits `output` on whitespace and drops repeated tokens, keeping first-seen order.
pub fn dedup_flags(output: &str) -> Vec<&str> {
    let mut seen = HashSet::new();
    output
        .split_whitespace()
        .filter(|flag| seen.insert(*flag))
        .collect()
}

/// Runs `pkg-config` and returns the de-duplicated flags joined by spaces.
///
/// # Errors
///
/// Fails if `pkg-config` is missing or exits unsuccessfully, e.g. because a
/// `.pc` file cannot be found.
pub async fn resolve_flags(settings: &Settings, query: &FlagQuery) -> Result<String> {
    let command = flags_command(settings, query);
    let output = command
        .run(settings.tools().timeout())
        .await
        .context("failed to resolve linker flags")?;

    let flags = dedup_flags(&output.stdout);
    log::info!("Resolved {} unique flags", flags.len());
    Ok(flags.join(" "))
}
