//! Backup schemas of the supported forks and the registry describing them.
//!
//! The forks share one logical data model (a manga library) but each defines
//! its own protobuf messages. Field names are stable across forks while tag
//! numbers and field sets drift, so everything outside this module works in
//! terms of wire names.

#[macro_use]
mod macros;
mod descriptor;
pub mod registry;

pub mod j2k;
pub mod mihon;
pub mod sy;

pub use descriptor::{FieldDescriptor, FieldKind, MessageDescriptor, Presence};
pub use registry::{lookup, Entity, SchemaDescriptor};

use crate::error::Result;
use crate::projection::{DropLog, FieldPath, GenericRecord, Projectable};
use prost::Message;
use serde::Serialize;

/// Distinct protobuf schemas; several format tags may map to one schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Schema {
    Sy,
    Mihon,
    J2k,
}

impl Schema {
    pub fn descriptor(self) -> &'static dyn SchemaDescriptor {
        match self {
            Schema::Sy => &sy::SCHEMA,
            Schema::Mihon => &mihon::SCHEMA,
            Schema::J2k => &j2k::SCHEMA,
        }
    }
}

/// Manga update strategy, shared by the forks that declare `updateStrategy`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum UpdateStrategy {
    AlwaysUpdate = 0,
    OnlyFetchOnce = 1,
}

/// A decoded backup of one of the supported schemas
#[derive(Debug, Clone, PartialEq)]
pub enum TypedBackup {
    Sy(sy::Backup),
    Mihon(mihon::Backup),
    J2k(j2k::Backup),
}

impl TypedBackup {
    pub fn schema(&self) -> Schema {
        match self {
            TypedBackup::Sy(_) => Schema::Sy,
            TypedBackup::Mihon(_) => Schema::Mihon,
            TypedBackup::J2k(_) => Schema::J2k,
        }
    }

    /// Empty backup of the given schema
    pub fn empty(schema: Schema) -> Self {
        match schema {
            Schema::Sy => TypedBackup::Sy(sy::Backup::default()),
            Schema::Mihon => TypedBackup::Mihon(mihon::Backup::default()),
            Schema::J2k => TypedBackup::J2k(j2k::Backup::default()),
        }
    }

    pub fn manga_count(&self) -> usize {
        match self {
            TypedBackup::Sy(b) => b.backup_manga.len(),
            TypedBackup::Mihon(b) => b.backup_manga.len(),
            TypedBackup::J2k(b) => b.backup_manga.len(),
        }
    }

    pub fn project_record(&self) -> GenericRecord {
        match self {
            TypedBackup::Sy(b) => b.project_record(),
            TypedBackup::Mihon(b) => b.project_record(),
            TypedBackup::J2k(b) => b.project_record(),
        }
    }

    pub fn materialize_record(
        schema: Schema,
        record: &GenericRecord,
        path: &FieldPath<'_>,
        drops: &mut DropLog,
    ) -> Result<Self> {
        Ok(match schema {
            Schema::Sy => TypedBackup::Sy(sy::Backup::materialize_record(record, path, drops)?),
            Schema::Mihon => {
                TypedBackup::Mihon(mihon::Backup::materialize_record(record, path, drops)?)
            }
            Schema::J2k => TypedBackup::J2k(j2k::Backup::materialize_record(record, path, drops)?),
        })
    }

    /// Decode a protobuf payload (already decompressed)
    pub fn decode(schema: Schema, payload: &[u8]) -> Result<Self, prost::DecodeError> {
        Ok(match schema {
            Schema::Sy => TypedBackup::Sy(sy::Backup::decode(payload)?),
            Schema::Mihon => TypedBackup::Mihon(mihon::Backup::decode(payload)?),
            Schema::J2k => TypedBackup::J2k(j2k::Backup::decode(payload)?),
        })
    }

    pub fn encode_to_vec(&self) -> Vec<u8> {
        match self {
            TypedBackup::Sy(b) => b.encode_to_vec(),
            TypedBackup::Mihon(b) => b.encode_to_vec(),
            TypedBackup::J2k(b) => b.encode_to_vec(),
        }
    }

    pub fn as_sy(&self) -> Option<&sy::Backup> {
        match self {
            TypedBackup::Sy(b) => Some(b),
            _ => None,
        }
    }

    pub fn into_sy(self) -> Option<sy::Backup> {
        match self {
            TypedBackup::Sy(b) => Some(b),
            _ => None,
        }
    }
}

impl From<sy::Backup> for TypedBackup {
    fn from(backup: sy::Backup) -> Self {
        TypedBackup::Sy(backup)
    }
}

impl From<mihon::Backup> for TypedBackup {
    fn from(backup: mihon::Backup) -> Self {
        TypedBackup::Mihon(backup)
    }
}

impl From<j2k::Backup> for TypedBackup {
    fn from(backup: j2k::Backup) -> Self {
        TypedBackup::J2k(backup)
    }
}
