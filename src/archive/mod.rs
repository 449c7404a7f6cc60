//! Reading and writing `.tachibk` backup files.
//!
//! A backup file is a gzip-compressed protobuf `Backup` message. Nothing in
//! the payload says which fork wrote it, so the format comes from the caller,
//! the file name, or a configured fallback, in that order.

pub mod compression;

use crate::error::{ErrorContext, Result};
use crate::format::BackupFormat;
use crate::schema::TypedBackup;
use std::fs;
use std::path::{Path, PathBuf};

/// Decode a decompressed protobuf payload with the schema of `format`
pub fn decode(payload: &[u8], format: BackupFormat) -> Result<TypedBackup> {
    Ok(TypedBackup::decode(format.schema(), payload)?)
}

pub fn encode(backup: &TypedBackup) -> Vec<u8> {
    backup.encode_to_vec()
}

/// Decompress and decode the raw content of a backup file
pub fn read_backup(content: &[u8], format: BackupFormat) -> Result<TypedBackup> {
    let payload = compression::decompress(content).context("Backup is not gzip-compressed")?;
    decode(&payload, format)
}

/// Encode and compress a backup into file content
pub fn write_backup(backup: &TypedBackup) -> Result<Vec<u8>> {
    compression::compress(&encode(backup)).context("Failed to compress backup")
}

/// A backup read from disk together with the format it was read as
#[derive(Debug, Clone)]
pub struct LoadedBackup {
    pub path: PathBuf,
    pub format: BackupFormat,
    /// False when the format came from the fallback rather than the
    /// override or the file name
    pub detected: bool,
    pub backup: TypedBackup,
}

/// Load a backup file.
///
/// `format_override` wins over file-name detection; `fallback` applies when
/// neither yields a format.
pub fn load_backup(
    path: &Path,
    format_override: Option<BackupFormat>,
    fallback: BackupFormat,
) -> Result<LoadedBackup> {
    let (format, detected) = match format_override.or_else(|| BackupFormat::detect_from_path(path)) {
        Some(format) => (format, true),
        None => {
            tracing::warn!(
                path = %path.display(),
                fallback = %fallback,
                "Could not detect backup format from file name, using fallback"
            );
            (fallback, false)
        }
    };

    let content =
        fs::read(path).context(&format!("Failed to read backup {}", path.display()))?;
    let backup = read_backup(&content, format)?;

    tracing::info!(
        path = %path.display(),
        format = %format,
        manga = backup.manga_count(),
        "Loaded backup"
    );

    Ok(LoadedBackup {
        path: path.to_path_buf(),
        format,
        detected,
        backup,
    })
}

/// Write a backup file, creating parent directories as needed
pub fn save_backup(backup: &TypedBackup, path: &Path) -> Result<()> {
    let content = write_backup(backup)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .context(&format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).context(&format!("Failed to write backup {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        manga = backup.manga_count(),
        "Saved backup"
    );
    Ok(())
}
