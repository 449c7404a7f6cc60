use crate::error::BackupError;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Backup format tag
///
/// The tag travels next to a typed backup; it is not stored inside the
/// protobuf payload. Several tags may share one schema (NEKO reads and
/// writes SY payloads).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupFormat {
    Sy,
    Mihon,
    Neko,
    J2k,
}

impl BackupFormat {
    /// Format used for merge output, declares every field the others declare
    pub const SUPERSET: BackupFormat = BackupFormat::Sy;

    pub const ALL: [BackupFormat; 4] = [
        BackupFormat::Sy,
        BackupFormat::Mihon,
        BackupFormat::Neko,
        BackupFormat::J2k,
    ];

    pub fn schema(self) -> Schema {
        match self {
            BackupFormat::Sy | BackupFormat::Neko => Schema::Sy,
            BackupFormat::Mihon => Schema::Mihon,
            BackupFormat::J2k => Schema::J2k,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BackupFormat::Sy => "SY",
            BackupFormat::Mihon => "MIHON",
            BackupFormat::Neko => "NEKO",
            BackupFormat::J2k => "J2K",
        }
    }

    /// Guess the format from a file name ("neko", "sy", "mihon", "j2k").
    ///
    /// Only the final path component is inspected so directory names do not
    /// influence the result. Returns `None` when nothing matches.
    pub fn detect_from_path(path: &Path) -> Option<BackupFormat> {
        let file_name = path.file_name()?.to_string_lossy().to_lowercase();

        if file_name.contains("neko") {
            Some(BackupFormat::Neko)
        } else if file_name.contains("sy") {
            Some(BackupFormat::Sy)
        } else if file_name.contains("mihon") {
            Some(BackupFormat::Mihon)
        } else if file_name.contains("j2k") {
            Some(BackupFormat::J2k)
        } else {
            None
        }
    }
}

impl fmt::Display for BackupFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackupFormat {
    type Err = BackupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sy" => Ok(BackupFormat::Sy),
            "mihon" => Ok(BackupFormat::Mihon),
            "neko" => Ok(BackupFormat::Neko),
            "j2k" => Ok(BackupFormat::J2k),
            other => Err(BackupError::UnrecognizedFormat(other.to_string())),
        }
    }
}
