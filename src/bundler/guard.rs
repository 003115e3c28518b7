//! RAII guard for half-built bundle cleanup.
//!
//! Ensures a bundle directory is removed when a later step fails, so a
//! failed run never leaves a `.app` behind that looks complete.

use std::path::PathBuf;

/// Removes the guarded directory on drop unless [`BundleGuard::commit`] was called.
#[derive(Debug)]
pub struct BundleGuard {
    path: PathBuf,
    committed: bool,
}

impl BundleGuard {
    /// Starts guarding `path`. The directory need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            committed: false,
        }
    }

    /// Keeps the directory and returns its path.
    pub fn commit(mut self) -> PathBuf {
        self.committed = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for BundleGuard {
    fn drop(&mut self) {
        if self.committed || !self.path.exists() {
            return;
        }

        log::warn!(
            "Removing incomplete bundle at {}",
            self.path.display()
        );

        // Drop must never panic; a failed cleanup is only reported.
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            log::warn!(
                "Failed to remove incomplete bundle {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
