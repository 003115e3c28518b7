//! Command line argument parsing.
//!
//! One binary with a subcommand per packaging flow. Each flow takes the
//! executable's file name as its only required argument.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Packages SDL desktop binaries with their shared libraries
#[derive(Parser, Debug)]
#[command(
    name = "chesto_packager",
    version,
    about = "Package SDL desktop binaries with their shared libraries",
    long_about = "Copy the non-system shared libraries an executable links against next to it.

Usage:
  chesto_packager mac-bundle appstore.bin     # appstore.app with relative dylib paths
  chesto_packager win-copy appstore.bin       # appstore.exe + DLLs in the current folder
  chesto_packager pkg-flags                   # de-duplicated static link flags"
)]
pub struct Args {
    /// Configuration file (default: ./chesto_packager.toml, then the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors (and the pkg-flags result)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Packaging flow to run
    #[command(subcommand)]
    pub command: Command,
}

/// Packaging flows
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a macOS .app bundle with relative dylib load paths
    MacBundle {
        /// Executable file name, relative to the working directory
        #[arg(value_name = "BINARY")]
        binary: PathBuf,

        /// Directory to create the bundle in
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Directory copied into Contents/Resources (default: resin)
        #[arg(long, value_name = "DIR")]
        resources: Option<PathBuf>,

        /// Do not patch the executable's load paths
        #[arg(long)]
        no_rewrite: bool,
    },

    /// Copy non-system DLLs and an .exe copy of the binary into one folder
    WinCopy {
        /// Executable file name, relative to the working directory
        #[arg(value_name = "BINARY")]
        binary: PathBuf,

        /// Directory to copy into (default: current directory)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Print de-duplicated static linker flags from pkg-config
    PkgFlags {
        /// Also print compiler flags
        #[arg(long)]
        cflags: bool,

        /// Directory holding the .pc files
        #[arg(long, value_name = "DIR")]
        with_path: Option<String>,

        /// Libraries to query (default: the configured SDL2 + libcurl set)
        #[arg(value_name = "LIBRARY")]
        libraries: Vec<String>,
    },
}

impl Command {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::MacBundle { .. } => "mac-bundle",
            Command::WinCopy { .. } => "win-copy",
            Command::PkgFlags { .. } => "pkg-flags",
        }
    }
}

impl Args {
    /// Parse command line arguments without exiting the process
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(verbose, quiet),
        }
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print verbose message (only with --verbose)
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.verbose, args.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_mac_bundle_args() {
        let args = Args::try_parse_from([
            "chesto_packager",
            "-v",
            "mac-bundle",
            "appstore.bin",
            "--resources",
            "assets",
            "--no-rewrite",
        ])
        .unwrap();

        assert!(args.verbose);
        match args.command {
            Command::MacBundle {
                binary,
                resources,
                no_rewrite,
                out_dir,
            } => {
                assert_eq!(binary, PathBuf::from("appstore.bin"));
                assert_eq!(resources, Some(PathBuf::from("assets")));
                assert!(no_rewrite);
                assert!(out_dir.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_missing_binary_is_an_error() {
        let err = Args::try_parse_from(["chesto_packager", "win-copy"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_pkg_flags_libraries() {
        let args = Args::try_parse_from([
            "chesto_packager",
            "pkg-flags",
            "--cflags",
            "sdl2",
            "zlib",
        ])
        .unwrap();
        assert_eq!(args.command.name(), "pkg-flags");
        let Command::PkgFlags {
            cflags, libraries, ..
        } = args.command
        else {
            panic!("expected pkg-flags");
        };
        assert!(cflags);
        assert_eq!(libraries, vec!["sdl2", "zlib"]);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let err = Args::try_parse_from(["chesto_packager", "-v", "-q", "pkg-flags"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }
}
