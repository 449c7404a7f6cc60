//! Schema-agnostic intermediate representation of a backup.
//!
//! `project` walks a typed backup into a [`GenericRecord`] tree keyed by the
//! protobuf field names; `materialize` rebuilds a typed backup of any schema
//! from such a tree. Enum fields travel as plain integers, so no fork's
//! symbolic enum names leak into another fork.

use crate::error::{BackupError, Result};
use crate::format::BackupFormat;
use crate::schema::TypedBackup;
use indexmap::IndexMap;
use serde::Serialize;

pub mod codec;
mod path;


pub use codec::{FieldCodec, Projectable, Scalar};
pub use path::FieldPath;

/// A single value in a generic record
#[derive(Debug, Clone, PartialEq)]
pub enum GenericValue {
    Bool(bool),
    /// All integer widths and enum values
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<GenericValue>),
    Record(GenericRecord),
}

impl GenericValue {
    /// Short shape name used in conversion errors
    pub fn shape(&self) -> &'static str {
        match self {
            GenericValue::Bool(_) => "bool",
            GenericValue::Int(_) => "int",
            GenericValue::Float(_) => "float",
            GenericValue::Str(_) => "string",
            GenericValue::Bytes(_) => "bytes",
            GenericValue::List(_) => "list",
            GenericValue::Record(_) => "nested message",
        }
    }
}

/// Field-name keyed mapping, iteration follows insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericRecord {
    fields: IndexMap<String, GenericValue>,
}

impl GenericRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: GenericValue) -> Option<GenericValue> {
        self.fields.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&GenericValue> {
        self.fields.get(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl FromIterator<(String, GenericValue)> for GenericRecord {
    fn from_iter<I: IntoIterator<Item = (String, GenericValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A field discarded because the target schema does not declare it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedField {
    /// Schema path without element indices, e.g. `backupManga.notes`
    pub path: String,
    /// How many record instances carried the field
    pub occurrences: usize,
}

/// Collects dropped fields once per distinct schema path
#[derive(Debug, Default)]
pub struct DropLog {
    dropped: IndexMap<String, usize>,
}

impl DropLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: &FieldPath<'_>) {
        *self.dropped.entry(path.to_schema_string()).or_insert(0) += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.dropped.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dropped.len()
    }

    pub fn into_dropped(self) -> Vec<DroppedField> {
        self.dropped
            .into_iter()
            .map(|(path, occurrences)| DroppedField { path, occurrences })
            .collect()
    }
}

/// Project a typed backup into its generic record.
///
/// Fails with `InvalidInput` when `format` does not describe the schema the
/// backup was decoded with.
pub fn project(backup: &TypedBackup, format: BackupFormat) -> Result<GenericRecord> {
    if backup.schema() != format.schema() {
        return Err(BackupError::InvalidInput(format!(
            "backup holds a {:?} payload but was tagged {}",
            backup.schema(),
            format
        )));
    }
    Ok(backup.project_record())
}

/// Build a typed backup of `format` from a generic record, ignoring fields
/// the format does not declare
pub fn materialize(record: &GenericRecord, format: BackupFormat) -> Result<TypedBackup> {
    let mut drops = DropLog::new();
    let backup = materialize_with(record, format, &mut drops)?;
    if !drops.is_empty() {
        tracing::debug!(
            target_format = %format,
            dropped = drops.len(),
            "Ignored fields not declared by target schema"
        );
    }
    Ok(backup)
}

/// Like [`materialize`], reporting every discarded field to `drops`
pub fn materialize_with(
    record: &GenericRecord,
    format: BackupFormat,
    drops: &mut DropLog,
) -> Result<TypedBackup> {
    TypedBackup::materialize_record(format.schema(), record, &FieldPath::root(), drops)
}
