//! Command execution for the packaging flows.
//!
//! Each subcommand loads settings, applies its command line overrides, runs
//! one bundler operation and reports the result.

mod mac_bundle;
mod pkg_flags;
mod win_copy;

use crate::bundler::{Settings, SettingsBuilder};
use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::{CliError, Result};
use std::path::Path;

use mac_bundle::execute_mac_bundle;
use pkg_flags::execute_pkg_flags;
use win_copy::execute_win_copy;

/// Execute the parsed command and return the process exit code
pub async fn execute_command(args: Args) -> Result<i32> {
    let config = RuntimeConfig::from(&args);
    let config_path = args.config.as_deref();

    let result = match &args.command {
        Command::MacBundle {
            binary,
            out_dir,
            resources,
            no_rewrite,
        } => {
            execute_mac_bundle(
                &config,
                config_path,
                binary,
                out_dir.as_deref(),
                resources.as_deref(),
                !*no_rewrite,
            )
            .await
        }
        Command::WinCopy { binary, out_dir } => {
            execute_win_copy(&config, config_path, binary, out_dir.as_deref()).await
        }
        Command::PkgFlags {
            cflags,
            with_path,
            libraries,
        } => {
            execute_pkg_flags(
                &config,
                config_path,
                *cflags,
                with_path.clone(),
                libraries.clone(),
            )
            .await
        }
    };

    match result {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            config.error_println(&format!("Command '{}' failed: {}", args.command.name(), e));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                config.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    config.indent(&format!("• {}", suggestion));
                }
            }

            Ok(1)
        }
    }
}

/// Loads settings from the config file and applies the output directory.
fn load_settings(config_path: Option<&Path>, out_dir: Option<&Path>) -> Result<SettingsBuilder> {
    let settings: Settings = crate::config::load(config_path)?;
    let builder = settings.into_builder();
    Ok(match out_dir {
        Some(dir) => builder.out_directory(dir),
        None => builder,
    })
}

/// Rejects an executable path that is not an existing file.
fn require_executable(binary: &Path) -> Result<()> {
    if binary.is_file() {
        Ok(())
    } else {
        Err(CliError::MissingExecutable {
            path: binary.to_path_buf(),
        }
        .into())
    }
}
