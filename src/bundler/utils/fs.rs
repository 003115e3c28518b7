//! File system utilities for bundling.
//!
//! Provides file operations with automatic directory creation,
//! symlink preservation, and path-aware error handling.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .await
            .fs_context("removing directory", path)
    } else {
        Ok(())
    }
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Symlinked sources are followed, so a `libfoo.dylib -> libfoo.1.dylib`
/// link lands in the bundle as a real file. Fails if the source path is a
/// directory or doesn't exist. Returns the number of bytes copied.
pub async fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file to", to)
}

/// Returns true when `a` and `b` name the same existing file.
///
/// Both paths are canonicalized, so `./tool.exe`, `tool.exe` and a path
/// through a symlinked directory all compare equal. A path that does not
/// exist yet is never the same file.
pub async fn same_file(a: &Path, b: &Path) -> Result<bool> {
    if !a.exists() || !b.exists() {
        return Ok(false);
    }
    let a = fs::canonicalize(a).await.fs_context("resolving path", a)?;
    let b = fs::canonicalize(b).await.fs_context("resolving path", b)?;
    Ok(a == b)
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// The contents of `from` end up directly inside `to`. Symlinks are
/// recreated rather than followed.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a Directory")));
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }

    for entry in walkdir::WalkDir::new(from) {
        let entry = entry?;
        debug_assert!(entry.path().starts_with(from));
        let rel_path = entry.path().strip_prefix(from)?;
        let dest_path = to.join(rel_path);

        if entry.file_type().is_symlink() {
            let target = fs::read_link(entry.path())
                .await
                .fs_context("reading symlink", entry.path())?;
            if entry.path().is_dir() {
                symlink_dir(&target, &dest_path).fs_context("creating symlink", &dest_path)?;
            } else {
                symlink_file(&target, &dest_path).fs_context("creating symlink", &dest_path)?;
            }
        } else if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .await
                .fs_context("creating directory", &dest_path)?;
        } else {
            fs::copy(entry.path(), &dest_path)
                .await
                .fs_context("copying file to", &dest_path)?;
        }
    }

    Ok(())
}

/// Marks a file as executable (0o755). No-op on non-unix hosts.
pub async fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .await
            .fs_context("failed to set executable permissions", path)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_copy_file_creates_parents() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("libfoo.dylib");
        std::fs::write(&src, b"dylib").unwrap();

        let dst = temp.path().join("a/b/libfoo.dylib");
        let copied = copy_file(&src, &dst).await.unwrap();

        assert_eq!(copied, 5);
        assert_eq!(std::fs::read(&dst).unwrap(), b"dylib");
    }

    #[tokio::test]
    async fn test_copy_file_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = copy_file(&temp.path().join("nope"), &temp.path().join("out"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_same_file_resolves_relative_and_symlinked_paths() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("SDL2.dll");
        std::fs::write(&file, b"dll").unwrap();
        let dotted = temp.path().join(".").join("SDL2.dll");

        assert!(same_file(&file, &dotted).await.unwrap());
        assert!(!same_file(&file, &temp.path().join("zlib1.dll")).await.unwrap());

        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(temp.path(), temp.path().join("here")).unwrap();
            let through_link = temp.path().join("here/SDL2.dll");
            assert!(same_file(&file, &through_link).await.unwrap());
        }

        let other = temp.path().join("copy.dll");
        std::fs::write(&other, b"dll").unwrap();
        assert!(!same_file(&file, &other).await.unwrap());
    }

    #[tokio::test]
    async fn test_copy_dir_places_contents_inside_destination() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("resin");
        std::fs::create_dir_all(src.join("fonts")).unwrap();
        std::fs::write(src.join("fonts/mono.ttf"), b"font").unwrap();
        std::fs::write(src.join("icon.png"), b"png").unwrap();

        let dst = temp.path().join("App.app/Contents/Resources");
        copy_dir(&src, &dst).await.unwrap();

        assert!(dst.join("fonts/mono.ttf").is_file());
        assert!(dst.join("icon.png").is_file());
        assert!(!dst.join("resin").exists());
    }

    #[tokio::test]
    async fn test_remove_dir_all_tolerates_missing() {
        let temp = TempDir::new().unwrap();
        remove_dir_all(&temp.path().join("absent")).await.unwrap();
    }
}
