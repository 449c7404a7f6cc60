/// Declare a backup message once and get the prost struct, its schema
/// descriptor and its projection code from the same field list.
///
/// Each field is written as `#[prost(..)] pub name: Type => "wireName"`.
/// The wire name is the key used in generic records; two schemas carry a
/// value across only when they use the same wire name.
macro_rules! backup_message {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                pub $field:ident : $ty:ty => $wire:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct $name {
            $(
                $(#[$fmeta])*
                pub $field: $ty,
            )*
        }

        impl $crate::projection::Projectable for $name {
            fn descriptor() -> &'static $crate::schema::MessageDescriptor {
                static DESCRIPTOR: $crate::schema::MessageDescriptor =
                    $crate::schema::MessageDescriptor {
                        name: stringify!($name),
                        fields: &[
                            $(
                                $crate::schema::FieldDescriptor {
                                    name: $wire,
                                    kind: <$ty as $crate::projection::FieldCodec>::KIND,
                                    presence: <$ty as $crate::projection::FieldCodec>::PRESENCE,
                                },
                            )*
                        ],
                    };
                &DESCRIPTOR
            }

            fn project_record(&self) -> $crate::projection::GenericRecord {
                let mut record = $crate::projection::GenericRecord::new();
                $(
                    if let Some(value) =
                        $crate::projection::FieldCodec::project_field(&self.$field)
                    {
                        record.insert($wire, value);
                    }
                )*
                record
            }

            fn materialize_record(
                record: &$crate::projection::GenericRecord,
                path: &$crate::projection::FieldPath<'_>,
                drops: &mut $crate::projection::DropLog,
            ) -> $crate::error::Result<Self> {
                let descriptor = <Self as $crate::projection::Projectable>::descriptor();
                for key in record.keys() {
                    if !descriptor.declares(key) {
                        drops.record(&path.field(key));
                    }
                }

                let mut message = Self::default();
                $(
                    if let Some(value) = record.get($wire) {
                        message.$field =
                            <$ty as $crate::projection::FieldCodec>::materialize_field(
                                value,
                                &path.field($wire),
                                drops,
                            )?;
                    }
                )*
                Ok(message)
            }
        }

        impl $crate::projection::FieldCodec for Option<$name> {
            const KIND: $crate::schema::FieldKind =
                $crate::schema::FieldKind::Message(stringify!($name));
            const PRESENCE: $crate::schema::Presence = $crate::schema::Presence::Explicit;

            fn project_field(&self) -> Option<$crate::projection::GenericValue> {
                self.as_ref().map(|message| {
                    $crate::projection::GenericValue::Record(
                        $crate::projection::Projectable::project_record(message),
                    )
                })
            }

            fn materialize_field(
                value: &$crate::projection::GenericValue,
                path: &$crate::projection::FieldPath<'_>,
                drops: &mut $crate::projection::DropLog,
            ) -> $crate::error::Result<Self> {
                let record = $crate::projection::codec::expect_record(value, path)?;
                <$name as $crate::projection::Projectable>::materialize_record(record, path, drops)
                    .map(Some)
            }
        }

        impl $crate::projection::FieldCodec for Vec<$name> {
            const KIND: $crate::schema::FieldKind =
                $crate::schema::FieldKind::Message(stringify!($name));
            const PRESENCE: $crate::schema::Presence = $crate::schema::Presence::Repeated;

            fn project_field(&self) -> Option<$crate::projection::GenericValue> {
                if self.is_empty() {
                    return None;
                }
                Some($crate::projection::GenericValue::List(
                    self.iter()
                        .map(|message| {
                            $crate::projection::GenericValue::Record(
                                $crate::projection::Projectable::project_record(message),
                            )
                        })
                        .collect(),
                ))
            }

            fn materialize_field(
                value: &$crate::projection::GenericValue,
                path: &$crate::projection::FieldPath<'_>,
                drops: &mut $crate::projection::DropLog,
            ) -> $crate::error::Result<Self> {
                let items = $crate::projection::codec::expect_list(value, path)?;
                let mut messages = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let item_path = path.index(i);
                    let record = $crate::projection::codec::expect_record(item, &item_path)?;
                    messages.push(
                        <$name as $crate::projection::Projectable>::materialize_record(
                            record, &item_path, drops,
                        )?,
                    );
                }
                Ok(messages)
            }
        }
    };
}
