use serde::Serialize;

/// Value type of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    Bool,
    /// int32 and enum fields
    Int32,
    Int64,
    Float,
    String,
    Bytes,
    /// Nested message, identified by its Rust type name
    Message(&'static str),
}

/// How a schema tracks whether a field is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Presence {
    /// Always has a value, the default when unset
    Implicit,
    /// Explicitly set or absent
    Explicit,
    /// Repeated field, possibly empty
    Repeated,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldDescriptor {
    /// Protobuf field name, shared across schemas
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
}

impl FieldDescriptor {
    pub fn tracks_presence(&self) -> bool {
        self.presence == Presence::Explicit
    }
}

/// Declared field set of one message type in one schema
#[derive(Debug, Serialize)]
pub struct MessageDescriptor {
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl MessageDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}
