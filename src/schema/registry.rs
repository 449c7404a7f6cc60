//! Static registry from format identifier to declared message fields.
//!
//! The registry is the inspection view over the descriptors generated by
//! `backup_message!`. Materialization consults the same statics directly
//! through `Projectable::descriptor()`, so what `declares` answers here is
//! exactly what a conversion keeps.

use super::{FieldDescriptor, MessageDescriptor, Schema};
use crate::format::BackupFormat;

/// Logical entity types shared by all forks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Backup,
    Manga,
    Chapter,
    History,
    Tracking,
    Category,
    Source,
    ExtensionRepo,
    Preference,
    SourcePreferences,
    SavedSearch,
}

impl Entity {
    pub const ALL: [Entity; 11] = [
        Entity::Backup,
        Entity::Manga,
        Entity::Chapter,
        Entity::History,
        Entity::Tracking,
        Entity::Category,
        Entity::Source,
        Entity::ExtensionRepo,
        Entity::Preference,
        Entity::SourcePreferences,
        Entity::SavedSearch,
    ];
}

/// Declared field sets of one schema
///
/// Each schema module provides one implementation. A schema that has no
/// message for an entity returns `None` from [`SchemaDescriptor::message`].
pub trait SchemaDescriptor: Send + Sync {
    fn schema(&self) -> Schema;

    fn message(&self, entity: Entity) -> Option<&'static MessageDescriptor>;

    fn field(&self, entity: Entity, name: &str) -> Option<&'static FieldDescriptor> {
        self.message(entity)?.fields.iter().find(|f| f.name == name)
    }

    fn declares(&self, entity: Entity, name: &str) -> bool {
        self.field(entity, name).is_some()
    }
}

/// Schema descriptor for a format tag
pub fn lookup(format: BackupFormat) -> &'static dyn SchemaDescriptor {
    format.schema().descriptor()
}
