//! Single-entry extraction from release archives.
//!
//! Release archives contain the executable next to READMEs and license files.
//! Only the executable is wanted, so instead of unpacking everything this
//! module looks for one entry by its base name and writes it to a given path.
//!
//! ## Supported Formats
//!
//! - `.tar.gz` (Linux, macOS)
//! - `.zip` (Windows)

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use tar::Archive;

use super::platform::ArchiveFormat;
use crate::errors::CodegameError;

/// Fallback mode for entries stored without any execute bit.
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// Extracts the entry whose base name is `entry_name` to `dest`.
///
/// Directory components inside the archive are ignored, so
/// `codegame-go-linux-amd64/codegame-go` matches `codegame-go`. The first
/// matching regular file wins. On Unix the stored mode is applied; a mode
/// without execute bits is replaced by `0o755`.
///
/// # Errors
///
/// Returns [`CodegameError::ExtractionFailed`] if the archive cannot be read
/// and [`CodegameError::EntryNotFound`] if no entry has the requested name.
pub fn extract_entry(
    archive_path: &Path,
    format: ArchiveFormat,
    entry_name: &str,
    dest: &Path,
) -> Result<()> {
    let mode = match format {
        ArchiveFormat::TarGz => extract_tar_gz_entry(archive_path, entry_name, dest)?,
        ArchiveFormat::Zip => extract_zip_entry(archive_path, entry_name, dest)?,
    };

    let Some(mode) = mode else {
        return Err(CodegameError::EntryNotFound {
            archive: archive_path.to_path_buf(),
            entry: entry_name.to_string(),
        }
        .into());
    };

    set_executable_permissions(dest, mode)
}

fn extract_tar_gz_entry(archive_path: &Path, entry_name: &str, dest: &Path) -> Result<Option<u32>> {
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;
    let mut archive = Archive::new(GzDecoder::new(file));

    let entries = archive
        .entries()
        .map_err(|e| CodegameError::extraction_failed(archive_path, e.to_string()))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| CodegameError::extraction_failed(archive_path, e.to_string()))?;

        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = entry
            .path()
            .map_err(|e| CodegameError::extraction_failed(archive_path, e.to_string()))?;
        if path.file_name().and_then(|n| n.to_str()) != Some(entry_name) {
            continue;
        }

        let mode = entry.header().mode().unwrap_or(0);
        write_entry(&mut entry, archive_path, dest)?;
        return Ok(Some(mode));
    }

    Ok(None)
}

fn extract_zip_entry(archive_path: &Path, entry_name: &str, dest: &Path) -> Result<Option<u32>> {
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| CodegameError::extraction_failed(archive_path, e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| CodegameError::extraction_failed(archive_path, e.to_string()))?;

        if entry.is_dir() {
            continue;
        }

        // Zip names always use '/', regardless of the creating platform.
        let base_name = entry.name().rsplit('/').next().unwrap_or_default();
        if base_name != entry_name {
            continue;
        }

        let mode = entry.unix_mode().unwrap_or(0);
        write_entry(&mut entry, archive_path, dest)?;
        return Ok(Some(mode));
    }

    Ok(None)
}

fn write_entry(reader: &mut impl Read, archive_path: &Path, dest: &Path) -> Result<()> {
    let mut out = File::create(dest)
        .map_err(|e| CodegameError::io_error(format!("creating {}", dest.display()), e))?;
    std::io::copy(reader, &mut out)
        .map_err(|e| CodegameError::extraction_failed(archive_path, e.to_string()))?;
    Ok(())
}

#[cfg(unix)]
fn set_executable_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = mode & 0o7777;
    let mode = if mode & 0o111 == 0 {
        EXECUTABLE_MODE
    } else {
        mode
    };
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn set_executable_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
