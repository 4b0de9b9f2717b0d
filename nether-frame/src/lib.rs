//! Nether-Frame: compact binary record codec for Nethercore
//!
//! Given a fixed, ordered set of named fields with declared primitive types,
//! this crate produces a byte-exact serializer/deserializer pair for flat
//! records. There is no schema language and no reflection: the field list *is*
//! the wire contract.
//!
//! # Wire Format
//!
//! A record is the concatenation, in field declaration order, of each field's
//! encoding. There is no outer length, version tag or checksum; the reader must
//! know the schema.
//!
//! | Field type | Code | Encoding |
//! |------------|------|----------|
//! | `UnsignedLong` | 1 | 8 bytes, big-endian |
//! | `UnsignedInt` | 2 | 4 bytes, big-endian |
//! | `Text` | 3 | 1-byte length + 0..=255 UTF-8 bytes |
//! | `Flag` | 4 | 1 byte, `1` = true |
//!
//! # Guarantees
//!
//! - The encoded size is computed before allocation; serialize allocates once
//!   and never resizes.
//! - Deserialize must consume its input exactly. Short input fails with a
//!   bounds or format error, leftover bytes fail with a length mismatch.
//! - Serialize and deserialize visit fields in the same (declaration) order.
//!
//! # Usage
//!
//! ```
//! use nether_frame::{FieldDefinitions, FieldType, Frame, Record};
//!
//! let frame = Frame::new(
//!     FieldDefinitions::builder()
//!         .field("name", FieldType::Text)
//!         .field("age", FieldType::UnsignedInt)
//!         .field("isAdmin", FieldType::Flag)
//!         .build()
//!         .unwrap(),
//! );
//!
//! let record = Record::new()
//!     .with("name", "Kane")
//!     .with("age", 20u32)
//!     .with("isAdmin", false);
//!
//! let bytes = frame.serialize(&record).unwrap();
//! assert_eq!(bytes.len(), 10);
//! assert_eq!(frame.deserialize(&bytes).unwrap(), record);
//! ```
//!
//! For schemas known at compile time, [`frame_record!`] generates a typed
//! struct and [`TypedFrame`] encodes it with the same wire format.

mod codec;
mod cursor;
mod error;
mod schema;
mod schema_file;
mod size;
mod text;
mod typed;
mod value;

pub use codec::Frame;
pub use cursor::ByteCursor;
pub use error::{ErrorKind, FrameError, Result};
pub use schema::{FieldDef, FieldDefinitions, FieldDefinitionsBuilder, FieldType};
pub use schema_file::{FieldSpec, FieldTypeSpec, SchemaFile};
pub use size::{check_unsigned_int, encoded_size, encoded_size_with, record_size};
pub use text::{LossyUtf8, TextCodec, Utf8};
pub use typed::{FrameRecord, TypedFrame, WireField, definitions_of};
pub use value::{Record, Value};

// =============================================================================
// Constants
// =============================================================================

/// Longest byte block a one-byte length prefix can describe
pub const MAX_BYTES_LEN: usize = u8::MAX as usize;

/// Largest plain number accepted for an `UnsignedInt` field
///
/// Matches the 4-byte wire width; larger values are rejected instead of
/// being truncated.
pub const MAX_UNSIGNED_INT: i64 = u32::MAX as i64;
