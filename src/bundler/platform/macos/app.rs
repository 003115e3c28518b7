//! macOS application bundle (.app) creation.
//!
//! Produces the smallest layout Finder will launch:
//!
//! ```text
//! <id>.app/
//! └── Contents/
//!     ├── Info.plist           CFBundleExecutable + CFBundleGetInfoString
//!     ├── MacOS/
//!     │   ├── <executable>
//!     │   └── <bundled dylibs>
//!     └── Resources/           contents of the resource directory, if any
//! ```

use crate::bundler::{
    deps::{self, LibraryRef, Platform},
    error::{Context, Error, ErrorExt, Result},
    guard::BundleGuard,
    inspect,
    platform::short_identifier,
    settings::Settings,
    utils::fs,
};
use std::path::{Path, PathBuf};
use tokio::fs as tokio_fs;

use super::rewrite;

/// Paths making up a `.app` bundle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BundleLayout {
    /// `<out>/<id>.app`
    pub root: PathBuf,
    /// `<id>.app/Contents/MacOS`, holds the executable and its dylibs
    pub macos_dir: PathBuf,
    /// `<id>.app/Contents/Resources`
    pub resources_dir: PathBuf,
    /// `<id>.app/Contents/Info.plist`
    pub info_plist: PathBuf,
}

impl BundleLayout {
    /// Layout for bundle `identifier` under `out_dir`.
    pub fn new(out_dir: &Path, identifier: &str) -> Self {
        let root = out_dir.join(format!("{identifier}.app"));
        let contents = root.join("Contents");
        Self {
            macos_dir: contents.join("MacOS"),
            resources_dir: contents.join("Resources"),
            info_plist: contents.join("Info.plist"),
            root,
        }
    }
}

/// Bundles `executable` as a macOS .app bundle.
///
/// Discovers the executable's non-system dylibs, rewrites its load paths to
/// `@executable_path` (unless `rewrite_paths` is false), then assembles the
/// bundle. Returns a vector containing the path to the created .app bundle.
pub async fn bundle_project(
    executable: &Path,
    settings: &Settings,
    rewrite_paths: bool,
) -> Result<Vec<PathBuf>> {
    inspect::check_executable(executable, Platform::MacOs).await?;

    let libs = deps::discover_dependencies(Platform::MacOs, executable, settings).await?;

    // The executable is patched in place before it is copied, so the copy in
    // Contents/MacOS already carries the relative load paths.
    if rewrite_paths {
        rewrite::rewrite_load_paths(executable, &libs, settings).await?;
    } else {
        log::info!("Skipping load path rewrite");
    }

    let app = assemble_bundle(executable, &libs, settings).await?;
    Ok(vec![app])
}

/// Assembles the `.app` directory from an already-patched executable.
///
/// Any existing bundle at the target path is replaced. If a step fails, the
/// partially written bundle is removed.
pub async fn assemble_bundle(
    executable: &Path,
    libs: &[LibraryRef],
    settings: &Settings,
) -> Result<PathBuf> {
    let exe_name = executable_name(executable)?;
    let identifier = short_identifier(exe_name);
    if identifier.is_empty() {
        return Err(Error::GenericError(format!(
            "cannot derive a bundle name from {exe_name:?}"
        )));
    }

    let layout = BundleLayout::new(settings.out_directory(), identifier);
    log::info!("Bundling {}.app at {}", identifier, layout.root.display());

    fs::remove_dir_all(&layout.root)
        .await
        .context("failed to remove old app bundle")?;

    let guard = BundleGuard::new(&layout.root);

    tokio_fs::create_dir_all(&layout.macos_dir)
        .await
        .fs_context("failed to create MacOS directory", &layout.macos_dir)?;

    copy_executable(executable, exe_name, &layout).await?;
    copy_libraries(libs, &layout).await?;
    copy_resources(settings, &layout).await?;
    write_info_plist(&layout.info_plist, exe_name, &settings.macos().info_string)?;

    Ok(guard.commit())
}

/// Copies the executable into `Contents/MacOS` and sets executable permissions.
async fn copy_executable(executable: &Path, exe_name: &str, layout: &BundleLayout) -> Result<()> {
    let dst = layout.macos_dir.join(exe_name);
    fs::copy_file(executable, &dst)
        .await
        .with_context(|| format!("failed to copy {} to .app bundle", exe_name))?;
    fs::make_executable(&dst).await
}

/// Copies each dylib next to the executable, in discovery order.
async fn copy_libraries(libs: &[LibraryRef], layout: &BundleLayout) -> Result<()> {
    for lib in libs {
        let dst = layout.macos_dir.join(lib.name());
        fs::copy_file(Path::new(lib.source()), &dst)
            .await
            .with_context(|| format!("failed to copy dylib {}", lib.source()))?;
        log::debug!("Copied {} into bundle", lib.name());
    }
    Ok(())
}

/// Copies the configured resource directory into `Contents/Resources`.
///
/// A missing resource directory is skipped with a warning.
async fn copy_resources(settings: &Settings, layout: &BundleLayout) -> Result<()> {
    let Some(resource_dir) = settings
        .macos()
        .resource_dir
        .as_deref()
        .filter(|dir| !dir.as_os_str().is_empty())
    else {
        return Ok(());
    };

    if !resource_dir.is_dir() {
        log::warn!(
            "Resource directory {} not found, bundle will have no resources",
            resource_dir.display()
        );
        return Ok(());
    }

    fs::copy_dir(resource_dir, &layout.resources_dir)
        .await
        .with_context(|| format!("failed to copy resources from {}", resource_dir.display()))
}

/// Builds the Info.plist dictionary.
///
/// `CFBundleExecutable` is the executable's file name verbatim; XML escaping
/// is left to the plist writer.
pub fn info_plist(exe_name: &str, info_string: &str) -> plist::Value {
    let mut dict = plist::Dictionary::new();
    dict.insert("CFBundleExecutable".into(), exe_name.into());
    dict.insert("CFBundleGetInfoString".into(), info_string.into());
    plist::Value::Dictionary(dict)
}

/// Writes the Info.plist file for the bundle.
fn write_info_plist(path: &Path, exe_name: &str, info_string: &str) -> Result<()> {
    info_plist(exe_name, info_string)
        .to_file_xml(path)
        .map_err(Error::Plist)
}

fn executable_name(executable: &Path) -> Result<&str> {
    executable
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("invalid executable path: {}", executable.display()))
}
