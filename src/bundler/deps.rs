//! Shared-library dependency discovery.
//!
//! Runs the platform's listing tool against an executable and turns its text
//! output into an ordered list of [`LibraryRef`]s:
//!
//! ```text
//! otool -L app.bin                      ldd app.bin
//! app.bin:                                  ntdll.dll => /c/WINDOWS/SYSTEM32/ntdll.dll (0x7ffd)
//!   /opt/homebrew/lib/libSDL2.dylib (...)   SDL2.dll => /mingw64/bin/SDL2.dll (0x6c84)
//!   /usr/lib/libSystem.B.dylib (...)
//! ```
//!
//! Filtering happens before anything is mutated. Duplicates are kept: a
//! library listed twice is rewritten and copied twice.

use crate::bundler::{
    error::{Context, Result},
    settings::Settings,
    tools::ToolCommand,
};
use std::fmt;
use std::path::Path;

/// Target platform of a packaging flow.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Platform {
    /// `.app` bundle with rewritten load paths, listed by `otool -L`.
    MacOs,
    /// Flat DLL copy next to the executable, listed by MSYS2 `ldd`.
    Windows,
}

impl Platform {
    /// Token that marks a dependency line in the listing tool's output.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Platform::MacOs => "(",
            Platform::Windows => "=>",
        }
    }

    /// Builds the listing command for `executable`.
    pub fn listing_command(&self, settings: &Settings, executable: &Path) -> ToolCommand {
        match self {
            Platform::MacOs => ToolCommand::new(&settings.tools().otool)
                .arg("-L")
                .arg(executable),
            Platform::Windows => ToolCommand::new(&settings.tools().ldd).arg(executable),
        }
    }

    /// Returns the keep/drop rule for this platform.
    pub fn prefix_rule(&self, settings: &Settings) -> PrefixRule {
        match self {
            Platform::MacOs => PrefixRule::Keep(settings.macos().install_prefix.clone()),
            Platform::Windows => PrefixRule::Drop(settings.windows().system_prefix.clone()),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::MacOs => write!(f, "macOS"),
            Platform::Windows => write!(f, "Windows"),
        }
    }
}

/// Which library paths survive discovery.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PrefixRule {
    /// Keep only paths starting with the prefix (exact case).
    Keep(String),
    /// Keep everything except paths starting with the prefix.
    ///
    /// Compared ASCII case-insensitively, since MSYS2 reports the Windows
    /// directory as both `/c/Windows` and `/c/WINDOWS`.
    Drop(String),
}

impl PrefixRule {
    /// Returns true if `path` should be bundled.
    pub fn admits(&self, path: &str) -> bool {
        match self {
            PrefixRule::Keep(prefix) => path.starts_with(prefix.as_str()),
            PrefixRule::Drop(prefix) => !starts_with_ignore_ascii_case(path, prefix),
        }
    }
}

fn starts_with_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// A shared library an executable links against.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LibraryRef {
    source: String,
    name: String,
}

impl LibraryRef {
    /// Creates a reference from the path reported by the listing tool.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let name = source.rsplit('/').next().unwrap_or(&source).to_string();
        Self { source, name }
    }

    /// Path as reported by the listing tool.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Final path segment, e.g. `libSDL2-2.0.0.dylib`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Extracts the library path from a single listing line.
///
/// Returns `None` for lines without the platform delimiter, and for `ldd`
/// lines reporting an unresolved library (`=> not found`).
pub fn extract_path(platform: Platform, line: &str) -> Option<&str> {
    let delimiter = platform.delimiter();
    if !line.contains(delimiter) {
        return None;
    }

    match platform {
        Platform::MacOs => {
            let path = line.split(delimiter).next()?.trim();
            (!path.is_empty()).then_some(path)
        }
        Platform::Windows => {
            let (_, resolved) = line.split_once(delimiter)?;
            let path = resolved.split_whitespace().next()?;
            if path == "not" {
                log::warn!("Skipping unresolved library: {}", line.trim());
                return None;
            }
            Some(path)
        }
    }
}

/// Parses listing output into the qualifying libraries, in output order.
pub fn parse_listing(platform: Platform, output: &str, rule: &PrefixRule) -> Vec<LibraryRef> {
    output
        .lines()
        .filter_map(|line| extract_path(platform, line))
        .filter(|path| {
            let keep = rule.admits(path);
            if !keep {
                log::debug!("Ignoring {}", path);
            }
            keep
        })
        .map(LibraryRef::new)
        .collect()
}

/// Lists the libraries `executable` needs that should ship with it.
///
/// # Errors
///
/// Fails if the listing tool is missing, hangs, or exits unsuccessfully.
pub async fn discover_dependencies(
    platform: Platform,
    executable: &Path,
    settings: &Settings,
) -> Result<Vec<LibraryRef>> {
    let command = platform.listing_command(settings, executable);
    let output = command
        .run(settings.tools().timeout())
        .await
        .with_context(|| format!("failed to list dependencies of {}", executable.display()))?;

    let libs = parse_listing(platform, &output.stdout, &platform.prefix_rule(settings));
    log::info!(
        "Found {} {} dependenc{} of {}",
        libs.len(),
        platform,
        if libs.len() == 1 { "y" } else { "ies" },
        executable.display()
    );
    Ok(libs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OTOOL_OUTPUT: &str = "\
appstore.bin:
\t/opt/homebrew/opt/sdl2/lib/libSDL2-2.0.0.dylib (compatibility version 3001.0.0, current version 3001.10.0)
\t/usr/lib/libSystem.B.dylib (compatibility version 1.0.0, current version 1336.0.0)
\t/opt/homebrew/opt/curl/lib/libcurl.4.dylib (compatibility version 13.0.0, current version 13.0.0)
\t/System/Library/Frameworks/Cocoa.framework/Versions/A/Cocoa (compatibility version 1.0.0, current version 24.0.0)
\t/opt/homebrew/opt/sdl2/lib/libSDL2-2.0.0.dylib (compatibility version 3001.0.0, current version 3001.10.0)
";

    const LDD_OUTPUT: &str = "\
\tntdll.dll => /c/WINDOWS/SYSTEM32/ntdll.dll (0x7ffd8d3d0000)
\tKERNEL32.DLL => /c/Windows/System32/KERNEL32.DLL (0x7ffd8bd30000)
\tSDL2.dll => /mingw64/bin/SDL2.dll (0x6c840000)
\tlibcurl-4.dll => /mingw64/bin/libcurl-4.dll (0x7ffd5b3a0000)
\tlibmissing.dll => not found
";

    fn mac_rule() -> PrefixRule {
        PrefixRule::Keep("/opt/".into())
    }

    fn win_rule() -> PrefixRule {
        PrefixRule::Drop("/c/Windows".into())
    }

    #[test]
    fn test_otool_keeps_prefixed_paths_in_order_with_duplicates() {
        let libs = parse_listing(Platform::MacOs, OTOOL_OUTPUT, &mac_rule());
        let sources: Vec<_> = libs.iter().map(LibraryRef::source).collect();
        assert_eq!(
            sources,
            vec![
                "/opt/homebrew/opt/sdl2/lib/libSDL2-2.0.0.dylib",
                "/opt/homebrew/opt/curl/lib/libcurl.4.dylib",
                "/opt/homebrew/opt/sdl2/lib/libSDL2-2.0.0.dylib",
            ]
        );
    }

    #[test]
    fn test_ldd_drops_system_dlls_and_unresolved() {
        let libs = parse_listing(Platform::Windows, LDD_OUTPUT, &win_rule());
        let names: Vec<_> = libs.iter().map(LibraryRef::name).collect();
        assert_eq!(names, vec!["SDL2.dll", "libcurl-4.dll"]);
        assert_eq!(libs[0].source(), "/mingw64/bin/SDL2.dll");
    }

    #[test]
    fn test_lines_without_delimiter_are_ignored() {
        assert_eq!(extract_path(Platform::MacOs, "appstore.bin:"), None);
        assert_eq!(extract_path(Platform::Windows, "statically linked"), None);
        assert!(parse_listing(Platform::MacOs, "garbage\n\n", &mac_rule()).is_empty());
    }

    #[test]
    fn test_otool_line_extraction_trims_whitespace() {
        let line = "\t  /opt/local/lib/libz.1.dylib   (compatibility version 1.0.0)";
        assert_eq!(
            extract_path(Platform::MacOs, line),
            Some("/opt/local/lib/libz.1.dylib")
        );
    }

    #[test]
    fn test_library_short_name() {
        let lib = LibraryRef::new("/opt/homebrew/lib/libpng16.16.dylib");
        assert_eq!(lib.name(), "libpng16.16.dylib");
        assert_eq!(LibraryRef::new("bare.dll").name(), "bare.dll");
    }

    #[test]
    fn test_keep_rule_is_case_sensitive() {
        assert!(mac_rule().admits("/opt/x.dylib"));
        assert!(!mac_rule().admits("/OPT/x.dylib"));
        assert!(!mac_rule().admits("/usr/lib/libc++.1.dylib"));
    }

    #[test]
    fn test_drop_rule_ignores_case() {
        assert!(!win_rule().admits("/c/WINDOWS/SYSTEM32/ntdll.dll"));
        assert!(!win_rule().admits("/c/Windows/System32/user32.dll"));
        assert!(win_rule().admits("/mingw64/bin/zlib1.dll"));
        assert!(win_rule().admits("/c"));
    }
}
