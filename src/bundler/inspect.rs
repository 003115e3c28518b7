//! Executable format sniffing.
//!
//! The listing tools are the authority on dependencies, but feeding `otool`
//! a PE file (or `ldd` a Mach-O) produces confusing output. Checking the
//! magic bytes up front turns that into a clear warning.

use crate::bundler::{
    deps::Platform,
    error::{ErrorExt, Result},
};
use std::fmt;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Container format of an executable, as far as the packager cares.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinaryFormat {
    /// Mach-O, thin or fat.
    MachO,
    /// Windows Portable Executable.
    Pe,
    /// ELF.
    Elf,
    /// Anything else, including files shorter than 16 bytes.
    Unknown,
}

impl BinaryFormat {
    /// Returns true if this format is what `platform`'s tools expect.
    pub fn matches(&self, platform: Platform) -> bool {
        matches!(
            (self, platform),
            (BinaryFormat::MachO, Platform::MacOs) | (BinaryFormat::Pe, Platform::Windows)
        )
    }
}

impl fmt::Display for BinaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinaryFormat::MachO => "Mach-O",
            BinaryFormat::Pe => "PE",
            BinaryFormat::Elf => "ELF",
            BinaryFormat::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Classifies a binary from its leading bytes.
pub fn detect_format(data: &[u8]) -> BinaryFormat {
    let Some(hint_bytes) = data.get(0..16).and_then(|s| <&[u8; 16]>::try_from(s).ok()) else {
        return BinaryFormat::Unknown;
    };

    match goblin::peek_bytes(hint_bytes) {
        Ok(goblin::Hint::Mach(_)) | Ok(goblin::Hint::MachFat(_)) => BinaryFormat::MachO,
        Ok(goblin::Hint::PE) => BinaryFormat::Pe,
        Ok(goblin::Hint::Elf(_)) => BinaryFormat::Elf,
        Ok(_) => BinaryFormat::Unknown,
        Err(e) => {
            log::debug!("Failed to detect binary format: {}", e);
            BinaryFormat::Unknown
        }
    }
}

/// Reads the executable's header and warns if it does not suit `platform`.
///
/// # Errors
///
/// Fails if the executable cannot be opened or read.
pub async fn check_executable(path: &Path, platform: Platform) -> Result<BinaryFormat> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening executable", path)?;

    let mut header = Vec::with_capacity(16);
    (&mut file)
        .take(16)
        .read_to_end(&mut header)
        .await
        .fs_context("reading executable header", path)?;

    let format = detect_format(&header);
    if format.matches(platform) {
        log::debug!("{} is a {} executable", path.display(), format);
    } else {
        log::warn!(
            "{} looks like a {} file, not a {} executable; continuing anyway",
            path.display(),
            format,
            platform
        );
    }
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(prefix: &[u8]) -> Vec<u8> {
        let mut data = prefix.to_vec();
        data.resize(64, 0);
        data
    }

    #[test]
    fn test_detects_macho_64() {
        // MH_MAGIC_64, little endian
        let data = padded(&[0xcf, 0xfa, 0xed, 0xfe]);
        assert_eq!(detect_format(&data), BinaryFormat::MachO);
        assert!(BinaryFormat::MachO.matches(Platform::MacOs));
    }

    #[test]
    fn test_detects_elf() {
        let data = padded(&[0x7f, b'E', b'L', b'F', 2, 1, 1, 0]);
        assert_eq!(detect_format(&data), BinaryFormat::Elf);
        assert!(!BinaryFormat::Elf.matches(Platform::Windows));
    }

    #[test]
    fn test_short_input_is_unknown() {
        assert_eq!(detect_format(b"MZ"), BinaryFormat::Unknown);
        assert_eq!(detect_format(b"#!/bin/sh\necho hi\n"), BinaryFormat::Unknown);
    }

    #[tokio::test]
    async fn test_check_executable_missing_file() {
        let err = check_executable(Path::new("/nonexistent/app.bin"), Platform::MacOs)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("opening executable"));
    }
}
