use crate::error::{BackupError, Result};
use crate::format::BackupFormat;
use crate::projection::{self, DropLog, DroppedField};
use crate::schema::TypedBackup;
use serde::Serialize;

/// Outcome of a conversion together with what the target could not hold
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub backup: TypedBackup,
    pub source: BackupFormat,
    pub target: BackupFormat,
    /// One entry per distinct field path discarded by the target schema
    pub dropped: Vec<DroppedField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub source: BackupFormat,
    pub target: BackupFormat,
    pub manga: usize,
    pub dropped_fields: usize,
}

impl ConversionReport {
    pub fn summary(&self) -> ConversionSummary {
        ConversionSummary {
            source: self.source,
            target: self.target,
            manga: self.backup.manga_count(),
            dropped_fields: self.dropped.len(),
        }
    }
}

/// Convert `backup` from `source` to `target` format.
///
/// Always a projection followed by a materialization; there is no
/// format-pair specific code. Fields the target does not declare are
/// dropped and logged once per distinct path.
pub fn convert(
    backup: &TypedBackup,
    source: BackupFormat,
    target: BackupFormat,
) -> Result<TypedBackup> {
    convert_with_report(backup, source, target).map(|report| report.backup)
}

pub fn convert_with_report(
    backup: &TypedBackup,
    source: BackupFormat,
    target: BackupFormat,
) -> Result<ConversionReport> {
    let record = projection::project(backup, source)?;

    let mut drops = DropLog::new();
    let converted = projection::materialize_with(&record, target, &mut drops)?;
    let dropped = drops.into_dropped();

    for field in &dropped {
        tracing::warn!(
            from = %source,
            to = %target,
            field = %field.path,
            occurrences = field.occurrences,
            "Dropping field not supported by target format"
        );
    }

    tracing::info!(
        from = %source,
        to = %target,
        manga = converted.manga_count(),
        dropped_fields = dropped.len(),
        "Converted backup"
    );

    Ok(ConversionReport {
        backup: converted,
        source,
        target,
        dropped,
    })
}

/// Convert using textual format identifiers, as received from a caller
pub fn convert_named(backup: &TypedBackup, source: &str, target: &str) -> Result<TypedBackup> {
    let source: BackupFormat = source.parse()?;
    let target: BackupFormat = target.parse()?;
    convert(backup, source, target)
}

/// Bring a backup into the superset schema, moving it when already there
pub(crate) fn into_superset(backup: TypedBackup, format: BackupFormat) -> Result<crate::schema::sy::Backup> {
    if backup.schema() != format.schema() {
        return Err(BackupError::InvalidInput(format!(
            "backup holds a {:?} payload but was tagged {}",
            backup.schema(),
            format
        )));
    }

    let converted = if format.schema() == BackupFormat::SUPERSET.schema() {
        backup
    } else {
        convert(&backup, format, BackupFormat::SUPERSET)?
    };

    converted.into_sy().ok_or_else(|| {
        BackupError::Other("superset conversion produced a non-SY backup".to_string())
    })
}
