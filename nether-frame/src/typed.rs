//! Statically typed records
//!
//! [`Frame`](crate::Frame) checks every value against its declared field type
//! at runtime. When the schema is known at compile time, [`frame_record!`]
//! generates a plain struct whose field types *are* the schema, so the type
//! check happens in the compiler and only decoding of external bytes can fail.
//!
//! | Rust type | Field type |
//! |-----------|------------|
//! | `u64` | `UnsignedLong` |
//! | `u32` | `UnsignedInt` |
//! | `String` | `Text` |
//! | `bool` | `Flag` |
//!
//! Records with layouts outside the schema model (e.g. `u16` counters) can
//! implement [`FrameRecord`] by hand and still go through [`TypedFrame`],
//! which applies the same exact-size and full-consumption rules.

use std::marker::PhantomData;

use crate::codec::ensure_finished;
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::schema::{FieldDefinitions, FieldType};
use crate::text::{TextCodec, Utf8};

/// A Rust type with a fixed wire kind
pub trait WireField: Sized {
    const FIELD_TYPE: FieldType;

    fn encoded_size<C: TextCodec + ?Sized>(&self, codec: &C) -> usize;

    fn write<C: TextCodec + ?Sized>(&self, cursor: &mut ByteCursor<Vec<u8>>, codec: &C)
    -> Result<()>;

    fn read<B: AsRef<[u8]>, C: TextCodec + ?Sized>(
        cursor: &mut ByteCursor<B>,
        codec: &C,
    ) -> Result<Self>;
}

impl WireField for u64 {
    const FIELD_TYPE: FieldType = FieldType::UnsignedLong;

    fn encoded_size<C: TextCodec + ?Sized>(&self, _codec: &C) -> usize {
        8
    }

    fn write<C: TextCodec + ?Sized>(&self, cursor: &mut ByteCursor<Vec<u8>>, _codec: &C) -> Result<()> {
        cursor.write_u64(*self)?;
        Ok(())
    }

    fn read<B: AsRef<[u8]>, C: TextCodec + ?Sized>(cursor: &mut ByteCursor<B>, _codec: &C) -> Result<Self> {
        cursor.read_u64()
    }
}

impl WireField for u32 {
    const FIELD_TYPE: FieldType = FieldType::UnsignedInt;

    fn encoded_size<C: TextCodec + ?Sized>(&self, _codec: &C) -> usize {
        4
    }

    fn write<C: TextCodec + ?Sized>(&self, cursor: &mut ByteCursor<Vec<u8>>, _codec: &C) -> Result<()> {
        cursor.write_u32(*self)?;
        Ok(())
    }

    fn read<B: AsRef<[u8]>, C: TextCodec + ?Sized>(cursor: &mut ByteCursor<B>, _codec: &C) -> Result<Self> {
        cursor.read_u32()
    }
}

impl WireField for String {
    const FIELD_TYPE: FieldType = FieldType::Text;

    fn encoded_size<C: TextCodec + ?Sized>(&self, codec: &C) -> usize {
        1 + codec.encoded_len(self)
    }

    fn write<C: TextCodec + ?Sized>(&self, cursor: &mut ByteCursor<Vec<u8>>, codec: &C) -> Result<()> {
        cursor.write_text(self, codec)?;
        Ok(())
    }

    fn read<B: AsRef<[u8]>, C: TextCodec + ?Sized>(cursor: &mut ByteCursor<B>, codec: &C) -> Result<Self> {
        cursor.read_text(codec)
    }
}

impl WireField for bool {
    const FIELD_TYPE: FieldType = FieldType::Flag;

    fn encoded_size<C: TextCodec + ?Sized>(&self, _codec: &C) -> usize {
        1
    }

    fn write<C: TextCodec + ?Sized>(&self, cursor: &mut ByteCursor<Vec<u8>>, _codec: &C) -> Result<()> {
        cursor.write_flag(*self)?;
        Ok(())
    }

    fn read<B: AsRef<[u8]>, C: TextCodec + ?Sized>(cursor: &mut ByteCursor<B>, _codec: &C) -> Result<Self> {
        cursor.read_flag()
    }
}

/// A record type that knows its own wire layout
pub trait FrameRecord: Sized {
    /// Exact number of bytes [`FrameRecord::encode`] writes
    fn encoded_size<C: TextCodec + ?Sized>(&self, codec: &C) -> Result<usize>;

    fn encode<C: TextCodec + ?Sized>(&self, cursor: &mut ByteCursor<Vec<u8>>, codec: &C) -> Result<()>;

    fn decode<B: AsRef<[u8]>, C: TextCodec + ?Sized>(
        cursor: &mut ByteCursor<B>,
        codec: &C,
    ) -> Result<Self>;
}

/// Serializer/deserializer pair for a [`FrameRecord`] type
pub struct TypedFrame<R, C = Utf8> {
    codec: C,
    _record: PhantomData<fn() -> R>,
}

impl<R: FrameRecord> TypedFrame<R, Utf8> {
    pub fn new() -> Self {
        Self::with_text_codec(Utf8)
    }
}

impl<R: FrameRecord> Default for TypedFrame<R, Utf8> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: FrameRecord, C: TextCodec> TypedFrame<R, C> {
    pub fn with_text_codec(codec: C) -> Self {
        Self {
            codec,
            _record: PhantomData,
        }
    }

    pub fn serialize(&self, record: &R) -> Result<Vec<u8>> {
        let size = record.encoded_size(&self.codec)?;
        let mut cursor = ByteCursor::with_len(size);
        record.encode(&mut cursor, &self.codec)?;
        // A hand-written record whose size and encoder disagree must not
        // produce a silently short buffer.
        ensure_finished(&cursor)?;

        tracing::trace!(bytes = size, "Serialized typed frame");
        Ok(cursor.into_bytes())
    }

    pub fn deserialize(&self, bytes: &[u8]) -> Result<R> {
        let mut cursor = ByteCursor::new(bytes);
        self.read_record(&mut cursor)
    }

    /// Decode from an existing cursor, rewinding it to offset 0 first
    pub fn deserialize_from<B: AsRef<[u8]>>(&self, cursor: &mut ByteCursor<B>) -> Result<R> {
        cursor.reset();
        self.read_record(cursor)
    }

    fn read_record<B: AsRef<[u8]>>(&self, cursor: &mut ByteCursor<B>) -> Result<R> {
        let record = R::decode(cursor, &self.codec)
            .and_then(|record| ensure_finished(cursor).map(|_| record));
        if let Err(e) = &record {
            tracing::debug!(error = %e, bytes = cursor.len(), "Rejected typed frame");
        }
        record
    }
}

/// Build [`FieldDefinitions`] from a generated `FIELDS` table
pub fn definitions_of(fields: &[(&str, FieldType)]) -> Result<FieldDefinitions> {
    FieldDefinitions::try_from_iter(fields.iter().map(|&(name, ty)| (name, ty)))
}

/// Declare a struct together with its frame layout
///
/// Fields are encoded in declaration order. Every field type must implement
/// [`WireField`].
///
/// ```
/// nether_frame::frame_record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct User {
///         pub name: String,
///         pub age: u32,
///         pub is_admin: bool,
///     }
/// }
///
/// let frame = nether_frame::TypedFrame::<User>::new();
/// let user = User { name: "Kane".into(), age: 20, is_admin: false };
/// let bytes = frame.serialize(&user).unwrap();
/// assert_eq!(bytes.len(), 10);
/// assert_eq!(frame.deserialize(&bytes).unwrap(), user);
/// ```
#[macro_export]
macro_rules! frame_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field: $ty, )*
        }

        impl $name {
            /// Field names and wire kinds in declaration order
            pub const FIELDS: &'static [(&'static str, $crate::FieldType)] = &[
                $( (stringify!($field), <$ty as $crate::WireField>::FIELD_TYPE), )*
            ];
        }

        impl $crate::FrameRecord for $name {
            fn encoded_size<C: $crate::TextCodec + ?Sized>(&self, codec: &C) -> $crate::Result<usize> {
                let _ = codec;
                Ok(0usize $( + $crate::WireField::encoded_size(&self.$field, codec) )*)
            }

            fn encode<C: $crate::TextCodec + ?Sized>(
                &self,
                cursor: &mut $crate::ByteCursor<::std::vec::Vec<u8>>,
                codec: &C,
            ) -> $crate::Result<()> {
                let _ = (&cursor, codec);
                $( $crate::WireField::write(&self.$field, cursor, codec)?; )*
                Ok(())
            }

            fn decode<B: ::core::convert::AsRef<[u8]>, C: $crate::TextCodec + ?Sized>(
                cursor: &mut $crate::ByteCursor<B>,
                codec: &C,
            ) -> $crate::Result<Self> {
                let _ = (&cursor, codec);
                Ok(Self {
                    $( $field: <$ty as $crate::WireField>::read(cursor, codec)?, )*
                })
            }
        }
    };
}
