//! Field-level conversion between prost message fields and generic values.
//!
//! Every field type that may appear in a backup message implements
//! [`FieldCodec`]. The Rust type of the field decides its presence semantics:
//! - `T` (implicit presence): projected unless it holds the default value
//! - `Option<T>` (explicit presence): projected only when `Some`, even `Some(0)`
//! - `Vec<T>` (repeated): projected unless empty, order preserved
//!
//! Message types get their codecs from the `backup_message!` macro.

use super::{DropLog, FieldPath, GenericRecord, GenericValue};
use crate::error::{BackupError, Result};
use crate::schema::{FieldKind, MessageDescriptor, Presence};

/// A message that can be walked into a generic record and rebuilt from one
pub trait Projectable: Sized {
    /// Declared fields of this message in its schema
    fn descriptor() -> &'static MessageDescriptor;

    fn project_record(&self) -> GenericRecord;

    /// Rebuild from a generic record. Keys the message does not declare are
    /// reported to `drops` and otherwise ignored.
    fn materialize_record(
        record: &GenericRecord,
        path: &FieldPath<'_>,
        drops: &mut DropLog,
    ) -> Result<Self>;
}

/// Conversion of one message field
pub trait FieldCodec: Sized {
    const KIND: FieldKind;
    const PRESENCE: Presence;

    /// `None` means the field is not explicitly present
    fn project_field(&self) -> Option<GenericValue>;

    fn materialize_field(
        value: &GenericValue,
        path: &FieldPath<'_>,
        drops: &mut DropLog,
    ) -> Result<Self>;
}

/// Leaf values (numbers, strings, bytes)
pub trait Scalar: Sized {
    const KIND: FieldKind;

    fn to_generic(&self) -> GenericValue;

    /// Whether an implicit-presence field holding this value counts as unset
    fn is_default(&self) -> bool;

    fn from_generic(value: &GenericValue, path: &FieldPath<'_>) -> Result<Self>;
}

fn mismatch(path: &FieldPath<'_>, expected: &str, found: &GenericValue) -> BackupError {
    BackupError::conversion(
        path.to_indexed_string(),
        format!("expected {}, found {}", expected, found.shape()),
    )
}

pub fn expect_record<'v>(value: &'v GenericValue, path: &FieldPath<'_>) -> Result<&'v GenericRecord> {
    match value {
        GenericValue::Record(record) => Ok(record),
        other => Err(mismatch(path, "nested message", other)),
    }
}

pub fn expect_list<'v>(value: &'v GenericValue, path: &FieldPath<'_>) -> Result<&'v [GenericValue]> {
    match value {
        GenericValue::List(items) => Ok(items),
        other => Err(mismatch(path, "list", other)),
    }
}

impl Scalar for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn to_generic(&self) -> GenericValue {
        GenericValue::Bool(*self)
    }

    fn is_default(&self) -> bool {
        !*self
    }

    fn from_generic(value: &GenericValue, path: &FieldPath<'_>) -> Result<Self> {
        match value {
            GenericValue::Bool(b) => Ok(*b),
            other => Err(mismatch(path, "bool", other)),
        }
    }
}

impl Scalar for i32 {
    const KIND: FieldKind = FieldKind::Int32;

    fn to_generic(&self) -> GenericValue {
        GenericValue::Int(i64::from(*self))
    }

    fn is_default(&self) -> bool {
        *self == 0
    }

    fn from_generic(value: &GenericValue, path: &FieldPath<'_>) -> Result<Self> {
        match value {
            GenericValue::Int(i) => i32::try_from(*i).map_err(|_| {
                BackupError::conversion(
                    path.to_indexed_string(),
                    format!("value {} out of range for int32", i),
                )
            }),
            other => Err(mismatch(path, "int", other)),
        }
    }
}

impl Scalar for i64 {
    const KIND: FieldKind = FieldKind::Int64;

    fn to_generic(&self) -> GenericValue {
        GenericValue::Int(*self)
    }

    fn is_default(&self) -> bool {
        *self == 0
    }

    fn from_generic(value: &GenericValue, path: &FieldPath<'_>) -> Result<Self> {
        match value {
            GenericValue::Int(i) => Ok(*i),
            other => Err(mismatch(path, "int", other)),
        }
    }
}

impl Scalar for f32 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_generic(&self) -> GenericValue {
        GenericValue::Float(f64::from(*self))
    }

    fn is_default(&self) -> bool {
        *self == 0.0
    }

    fn from_generic(value: &GenericValue, path: &FieldPath<'_>) -> Result<Self> {
        match value {
            GenericValue::Float(f) => Ok(*f as f32),
            GenericValue::Int(i) => Ok(*i as f32),
            other => Err(mismatch(path, "float", other)),
        }
    }
}

impl Scalar for String {
    const KIND: FieldKind = FieldKind::String;

    fn to_generic(&self) -> GenericValue {
        GenericValue::Str(self.clone())
    }

    fn is_default(&self) -> bool {
        self.is_empty()
    }

    fn from_generic(value: &GenericValue, path: &FieldPath<'_>) -> Result<Self> {
        match value {
            GenericValue::Str(s) => Ok(s.clone()),
            other => Err(mismatch(path, "string", other)),
        }
    }
}

impl Scalar for Vec<u8> {
    const KIND: FieldKind = FieldKind::Bytes;

    fn to_generic(&self) -> GenericValue {
        GenericValue::Bytes(self.clone())
    }

    fn is_default(&self) -> bool {
        self.is_empty()
    }

    fn from_generic(value: &GenericValue, path: &FieldPath<'_>) -> Result<Self> {
        match value {
            GenericValue::Bytes(b) => Ok(b.clone()),
            other => Err(mismatch(path, "bytes", other)),
        }
    }
}

macro_rules! scalar_field_codecs {
    ($($t:ty),* $(,)?) => {
        $(
            impl FieldCodec for $t {
                const KIND: FieldKind = <$t as Scalar>::KIND;
                const PRESENCE: Presence = Presence::Implicit;

                fn project_field(&self) -> Option<GenericValue> {
                    (!self.is_default()).then(|| self.to_generic())
                }

                fn materialize_field(
                    value: &GenericValue,
                    path: &FieldPath<'_>,
                    _drops: &mut DropLog,
                ) -> Result<Self> {
                    <$t as Scalar>::from_generic(value, path)
                }
            }

            impl FieldCodec for Option<$t> {
                const KIND: FieldKind = <$t as Scalar>::KIND;
                const PRESENCE: Presence = Presence::Explicit;

                fn project_field(&self) -> Option<GenericValue> {
                    self.as_ref().map(Scalar::to_generic)
                }

                fn materialize_field(
                    value: &GenericValue,
                    path: &FieldPath<'_>,
                    _drops: &mut DropLog,
                ) -> Result<Self> {
                    <$t as Scalar>::from_generic(value, path).map(Some)
                }
            }

            impl FieldCodec for Vec<$t> {
                const KIND: FieldKind = <$t as Scalar>::KIND;
                const PRESENCE: Presence = Presence::Repeated;

                fn project_field(&self) -> Option<GenericValue> {
                    if self.is_empty() {
                        return None;
                    }
                    Some(GenericValue::List(self.iter().map(Scalar::to_generic).collect()))
                }

                fn materialize_field(
                    value: &GenericValue,
                    path: &FieldPath<'_>,
                    _drops: &mut DropLog,
                ) -> Result<Self> {
                    expect_list(value, path)?
                        .iter()
                        .enumerate()
                        .map(|(i, item)| <$t as Scalar>::from_generic(item, &path.index(i)))
                        .collect()
                }
            }
        )*
    };
}

scalar_field_codecs!(bool, i32, i64, f32, String, Vec<u8>);
