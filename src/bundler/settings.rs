//! Configuration structures for packaging operations.
//!
//! Every value the packaging flows used to hard-code (tool names, prefix
//! filters, the pkg-config search path and library set, the resource
//! directory) lives here, with the historical values as defaults.
//!
//! Settings deserialize from TOML (see [`crate::config`]); every key is
//! optional:
//!
//! ```toml
//! [tools]
//! otool = "/usr/bin/otool"
//! timeout_secs = 60
//!
//! [macos]
//! install_prefix = "/opt/homebrew/"
//! resource_dir = "assets"
//!
//! [windows]
//! system_prefix = "/c/Windows"
//!
//! [pkg_config]
//! search_path = "/mingw64/lib/pkgconfig/"
//! libraries = ["sdl2", "libcurl"]
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// External tool names (or paths) and the invocation timeout.
///
/// Tests point these at fake scripts; production leaves them as bare names
/// resolved through `PATH`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ToolSettings {
    /// Mach-O dependency lister.
    ///
    /// Default: `"otool"`
    pub otool: String,

    /// Mach-O load-path patcher.
    ///
    /// Default: `"install_name_tool"`
    pub install_name_tool: String,

    /// Shared-library lister used under MSYS2.
    ///
    /// Default: `"ldd"`
    pub ldd: String,

    /// Package configuration query tool.
    ///
    /// Default: `"pkg-config"`
    pub pkg_config: String,

    /// Seconds to wait for any single tool before killing it.
    ///
    /// Default: 120
    pub timeout_secs: u64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            otool: "otool".into(),
            install_name_tool: "install_name_tool".into(),
            ldd: "ldd".into(),
            pkg_config: "pkg-config".into(),
            timeout_secs: 120,
        }
    }
}

impl ToolSettings {
    /// Returns the per-invocation timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// macOS `.app` bundling configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct MacOsSettings {
    /// Only libraries whose path starts with this prefix are bundled.
    ///
    /// System libraries (`/usr/lib`, `/System`) never match and stay linked
    /// against the host copy.
    ///
    /// Default: `"/opt/"`
    pub install_prefix: String,

    /// Loader token that replaces the absolute library directory.
    ///
    /// Default: `"@executable_path"`
    pub executable_token: String,

    /// Directory copied into `Contents/Resources`, relative to the
    /// working directory. `None`, or `""` in a config file, disables
    /// resource copying.
    ///
    /// Default: `Some("resin")`
    pub resource_dir: Option<PathBuf>,

    /// Value of `CFBundleGetInfoString` in `Info.plist`.
    ///
    /// Default: `"Created by Chesto"`
    pub info_string: String,
}

impl Default for MacOsSettings {
    fn default() -> Self {
        Self {
            install_prefix: "/opt/".into(),
            executable_token: "@executable_path".into(),
            resource_dir: Some(PathBuf::from("resin")),
            info_string: "Created by Chesto".into(),
        }
    }
}

/// Windows (MSYS2) DLL copying configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct WindowsSettings {
    /// DLLs under this prefix ship with Windows and are not copied.
    ///
    /// Default: `"/c/Windows"`
    pub system_prefix: String,
}

impl Default for WindowsSettings {
    fn default() -> Self {
        Self {
            system_prefix: "/c/Windows".into(),
        }
    }
}

/// pkg-config flag resolution configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PkgConfigSettings {
    /// Directory holding the `.pc` files, passed as `--with-path`.
    ///
    /// Default: `"/c/MSYS2/mingw64/lib/pkgconfig/"`
    pub search_path: String,

    /// Libraries queried when none are given on the command line.
    ///
    /// Default: `["sdl2", "sdl2_image", "sdl2_ttf", "sdl2_mixer", "libcurl"]`
    pub libraries: Vec<String>,
}

impl Default for PkgConfigSettings {
    fn default() -> Self {
        Self {
            search_path: "/c/MSYS2/mingw64/lib/pkgconfig/".into(),
            libraries: ["sdl2", "sdl2_image", "sdl2_ttf", "sdl2_mixer", "libcurl"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Main settings for packaging operations.
///
/// Constructed from a config file via [`crate::config::load`], or
/// programmatically via [`SettingsBuilder`].
///
/// # Examples
///
/// ```no_run
/// use chesto_packager::bundler::{MacOsSettings, SettingsBuilder};
///
/// # fn example() -> chesto_packager::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .out_directory("dist")
///     .macos(MacOsSettings {
///         install_prefix: "/usr/local/".into(),
///         ..Default::default()
///     })
///     .build()?;
/// assert_eq!(settings.macos().install_prefix, "/usr/local/");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// External tool configuration.
    tools: ToolSettings,

    /// macOS bundle configuration.
    macos: MacOsSettings,

    /// Windows copy configuration.
    windows: WindowsSettings,

    /// pkg-config configuration.
    pkg_config: PkgConfigSettings,

    /// Where bundles and copied files are written.
    ///
    /// Not read from the config file; set by the CLI. Empty means the
    /// current directory.
    #[serde(skip)]
    out_directory: PathBuf,
}

impl Settings {
    /// Returns the tool settings.
    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    /// Returns the macOS settings.
    pub fn macos(&self) -> &MacOsSettings {
        &self.macos
    }

    /// Returns the Windows settings.
    pub fn windows(&self) -> &WindowsSettings {
        &self.windows
    }

    /// Returns the pkg-config settings.
    pub fn pkg_config(&self) -> &PkgConfigSettings {
        &self.pkg_config
    }

    /// Returns the output directory.
    pub fn out_directory(&self) -> &Path {
        if self.out_directory.as_os_str().is_empty() {
            Path::new(".")
        } else {
            &self.out_directory
        }
    }

    /// Returns a builder pre-populated with these settings.
    pub fn into_builder(self) -> SettingsBuilder {
        SettingsBuilder {
            tools: self.tools,
            macos: self.macos,
            windows: self.windows,
            pkg_config: self.pkg_config,
            out_directory: Some(self.out_directory),
        }
    }
}

/// Builder for constructing [`Settings`].
///
/// Every section defaults to its historical values.
#[derive(Default)]
pub struct SettingsBuilder {
    tools: ToolSettings,
    macos: MacOsSettings,
    windows: WindowsSettings,
    pkg_config: PkgConfigSettings,
    out_directory: Option<PathBuf>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the output directory for bundles and copied files.
    ///
    /// Default: current directory
    pub fn out_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.out_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the external tool configuration.
    pub fn tools(mut self, tools: ToolSettings) -> Self {
        self.tools = tools;
        self
    }

    /// Sets the macOS bundle configuration.
    pub fn macos(mut self, macos: MacOsSettings) -> Self {
        self.macos = macos;
        self
    }

    /// Overrides only the macOS resource directory.
    pub fn resource_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.macos.resource_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets the Windows copy configuration.
    pub fn windows(mut self, windows: WindowsSettings) -> Self {
        self.windows = windows;
        self
    }

    /// Sets the pkg-config configuration.
    pub fn pkg_config(mut self, pkg_config: PkgConfigSettings) -> Self {
        self.pkg_config = pkg_config;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a tool name is empty or the timeout is zero.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        let tools = [
            ("otool", &self.tools.otool),
            ("install_name_tool", &self.tools.install_name_tool),
            ("ldd", &self.tools.ldd),
            ("pkg_config", &self.tools.pkg_config),
        ];
        for (key, value) in tools {
            if value.trim().is_empty() {
                crate::bail!("tools.{} must not be empty", key);
            }
        }
        if self.tools.timeout_secs == 0 {
            crate::bail!("tools.timeout_secs must be greater than zero");
        }

        Ok(Settings {
            tools: self.tools,
            macos: self.macos,
            windows: self.windows,
            pkg_config: self.pkg_config,
            out_directory: self.out_directory.unwrap_or_default(),
        })
    }
}
