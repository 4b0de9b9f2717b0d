//! Encoded size calculation
//!
//! Sizes are computed before anything is written so a frame can allocate its
//! buffer exactly once. The rules here must agree byte-for-byte with what the
//! cursor writes for each kind.
//!
//! | Value | Size |
//! |-------|------|
//! | `Flag` | 1 |
//! | `UnsignedLong` | 8 |
//! | `Number` | 4 (must lie in `0..=u32::MAX`) |
//! | `Text` | 1 + encoded byte length |
//! | `List` | sum of its elements (0 when empty) |
//! | `Map` | sum of its values; values must be primitives |

use crate::error::{FrameError, Result};
use crate::text::{TextCodec, Utf8};
use crate::value::{Record, Value};
use crate::MAX_UNSIGNED_INT;

/// Encoded size of `value` with UTF-8 text
pub fn encoded_size(value: &Value) -> Result<usize> {
    encoded_size_with(value, &Utf8)
}

/// Encoded size of `value`, measuring text through `codec`
pub fn encoded_size_with<C: TextCodec + ?Sized>(value: &Value, codec: &C) -> Result<usize> {
    match value {
        Value::List(items) => items
            .iter()
            .try_fold(0usize, |acc, item| -> Result<usize> {
                Ok(acc + encoded_size_with(item, codec)?)
            }),
        Value::Map(record) => record_size(record, codec),
        primitive => primitive_size(primitive, codec),
    }
}

/// Encoded size of a flat record
pub fn record_size<C: TextCodec + ?Sized>(record: &Record, codec: &C) -> Result<usize> {
    record
        .values()
        .try_fold(0usize, |acc, value| -> Result<usize> {
            Ok(acc + primitive_size(value, codec)?)
        })
}

/// Check that a plain number fits the 4-byte `UnsignedInt` encoding
pub fn check_unsigned_int(value: i64) -> Result<u32> {
    if !(0..=MAX_UNSIGNED_INT).contains(&value) {
        return Err(FrameError::NumberOutOfRange { value });
    }
    Ok(value as u32)
}

fn primitive_size<C: TextCodec + ?Sized>(value: &Value, codec: &C) -> Result<usize> {
    match value {
        Value::Flag(_) => Ok(1),
        Value::UnsignedLong(_) => Ok(8),
        Value::Number(n) => {
            check_unsigned_int(*n)?;
            Ok(4)
        }
        Value::Text(s) => Ok(1 + codec.encoded_len(s)),
        Value::List(_) | Value::Map(_) => Err(FrameError::UnsupportedValue { kind: value.kind() }),
    }
}
