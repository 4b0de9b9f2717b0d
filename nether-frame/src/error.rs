//! Frame codec error types

use thiserror::Error;

use crate::schema::FieldType;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FrameError>;

/// Broad category of a [`FrameError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A record value does not match its declared field type
    Validation,
    /// A value lies outside the range its wire encoding can hold
    Range,
    /// Encoded bytes are malformed
    Format,
    /// A read or write would cross the end of the cursor
    Bounds,
    /// A value kind cannot be sized or encoded at all
    Type,
    /// Field definitions are invalid
    Schema,
}

/// Errors produced while defining schemas, sizing, encoding or decoding frames
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Invalid data type for field `{field}`: expected {expected}")]
    TypeMismatch { field: String, expected: FieldType },

    #[error("Missing value for field `{field}`")]
    MissingField { field: String },

    #[error("Record contains undeclared field `{field}`")]
    UnknownField { field: String },

    #[error("Bytes are too long, max length is {max}, got {len}", max = crate::MAX_BYTES_LEN)]
    BytesTooLong { len: usize },

    #[error("Number is out of range: {value} (valid range 0..={max})", max = crate::MAX_UNSIGNED_INT)]
    NumberOutOfRange { value: i64 },

    #[error("Length prefix mismatch, expected {expected} bytes, got {remaining}")]
    LengthPrefixMismatch { expected: usize, remaining: usize },

    #[error("Buffer is not finished, length mismatch ({remaining} bytes left over)")]
    TrailingBytes { remaining: usize },

    #[error("Invalid UTF-8 in text field: {0}")]
    InvalidText(#[from] std::str::Utf8Error),

    #[error("Out of bounds: need {needed} bytes, {remaining} remaining")]
    OutOfBounds { needed: usize, remaining: usize },

    #[error("Unsupported value kind for frame encoding: {kind}")]
    UnsupportedValue { kind: &'static str },

    #[error("Duplicate field name `{0}`")]
    DuplicateField(String),

    #[error("Unknown field type code: {0}")]
    UnknownFieldType(u8),

    #[error("Invalid schema file: {0}")]
    SchemaFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// The category this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            FrameError::TypeMismatch { .. }
            | FrameError::MissingField { .. }
            | FrameError::UnknownField { .. } => ErrorKind::Validation,
            FrameError::BytesTooLong { .. } | FrameError::NumberOutOfRange { .. } => {
                ErrorKind::Range
            }
            FrameError::LengthPrefixMismatch { .. }
            | FrameError::TrailingBytes { .. }
            | FrameError::InvalidText(_) => ErrorKind::Format,
            FrameError::OutOfBounds { .. } => ErrorKind::Bounds,
            FrameError::UnsupportedValue { .. } => ErrorKind::Type,
            FrameError::DuplicateField(_)
            | FrameError::UnknownFieldType(_)
            | FrameError::SchemaFile(_)
            | FrameError::Io(_) => ErrorKind::Schema,
        }
    }
}

impl From<toml::de::Error> for FrameError {
    fn from(e: toml::de::Error) -> Self {
        FrameError::SchemaFile(e.to_string())
    }
}

impl From<serde_json::Error> for FrameError {
    fn from(e: serde_json::Error) -> Self {
        FrameError::SchemaFile(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FrameError::BytesTooLong { len: 256 }.to_string(),
            "Bytes are too long, max length is 255, got 256"
        );
        assert_eq!(
            FrameError::LengthPrefixMismatch {
                expected: 10,
                remaining: 3
            }
            .to_string(),
            "Length prefix mismatch, expected 10 bytes, got 3"
        );
        assert_eq!(
            FrameError::TypeMismatch {
                field: "age".to_string(),
                expected: FieldType::UnsignedInt,
            }
            .to_string(),
            "Invalid data type for field `age`: expected unsigned_int"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            FrameError::OutOfBounds {
                needed: 4,
                remaining: 1
            }
            .kind(),
            ErrorKind::Bounds
        );
        assert_eq!(
            FrameError::TrailingBytes { remaining: 2 }.kind(),
            ErrorKind::Format
        );
        assert_eq!(
            FrameError::NumberOutOfRange { value: -1 }.kind(),
            ErrorKind::Range
        );
        assert_eq!(
            FrameError::UnsupportedValue { kind: "map" }.kind(),
            ErrorKind::Type
        );
    }
}
