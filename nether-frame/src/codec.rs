//! Schema-driven frame codec
//!
//! A [`Frame`] binds a [`FieldDefinitions`] to a serialize/deserialize pair.
//! Both directions walk the fields in declaration order; the wire format is the
//! plain concatenation of each field's encoding, with no envelope.
//!
//! ```text
//! schema { name: Text, age: UnsignedInt, isAdmin: Flag }
//! record { name: "Kane", age: 20, isAdmin: false }
//!
//! 04 'K' 'a' 'n' 'e' | 00 00 00 14 | 00
//!   name (1 + 4)     |  age (4)    | isAdmin (1)
//! ```

use crate::cursor::ByteCursor;
use crate::error::{FrameError, Result};
use crate::schema::{FieldDefinitions, FieldType};
use crate::size::{check_unsigned_int, record_size};
use crate::text::{TextCodec, Utf8};
use crate::value::{Record, Value};

/// Serializer/deserializer pair for one fixed schema
///
/// Holds no per-call state, so one frame can be shared across threads and
/// used for any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct Frame<C = Utf8> {
    fields: FieldDefinitions,
    codec: C,
}

impl Frame<Utf8> {
    /// Create a frame with strict UTF-8 text
    pub fn new(fields: FieldDefinitions) -> Self {
        Self::with_text_codec(fields, Utf8)
    }
}

impl<C: TextCodec> Frame<C> {
    /// Create a frame that encodes and decodes `Text` fields through `codec`
    pub fn with_text_codec(fields: FieldDefinitions, codec: C) -> Self {
        Self { fields, codec }
    }

    /// Field definitions this frame encodes
    pub fn fields(&self) -> &FieldDefinitions {
        &self.fields
    }

    /// Codec used for `Text` fields
    pub fn text_codec(&self) -> &C {
        &self.codec
    }

    /// Exact number of bytes [`Frame::serialize`] produces for `record`
    pub fn encoded_size(&self, record: &Record) -> Result<usize> {
        self.check_record(record)?;
        record_size(record, &self.codec)
    }

    /// Encode `record` into a freshly allocated, exactly sized buffer
    pub fn serialize(&self, record: &Record) -> Result<Vec<u8>> {
        let size = self.encoded_size(record).inspect_err(|e| {
            tracing::debug!(error = %e, "Rejected record before encoding");
        })?;

        let mut cursor = ByteCursor::with_len(size);
        for def in &self.fields {
            let value = record
                .get(&def.name)
                .ok_or_else(|| FrameError::MissingField {
                    field: def.name.clone(),
                })?;
            self.write_field(&mut cursor, &def.name, def.field_type, value)
                .inspect_err(|e| tracing::debug!(field = %def.name, error = %e, "Failed to encode field"))?;
        }
        ensure_finished(&cursor)?;

        tracing::trace!(fields = self.fields.len(), bytes = size, "Serialized frame");
        Ok(cursor.into_bytes())
    }

    /// Decode a record, requiring `bytes` to be consumed exactly
    pub fn deserialize(&self, bytes: &[u8]) -> Result<Record> {
        let mut cursor = ByteCursor::new(bytes);
        self.read_record(&mut cursor)
    }

    /// Decode a record from an existing cursor, rewinding it to offset 0 first
    pub fn deserialize_from<B: AsRef<[u8]>>(&self, cursor: &mut ByteCursor<B>) -> Result<Record> {
        cursor.reset();
        self.read_record(cursor)
    }

    /// Match record keys and value kinds against the schema before sizing
    fn check_record(&self, record: &Record) -> Result<()> {
        if let Some(extra) = record.keys().find(|k| !self.fields.contains(k)) {
            return Err(FrameError::UnknownField {
                field: extra.to_owned(),
            });
        }
        for def in &self.fields {
            let value = record.get(&def.name).ok_or_else(|| FrameError::MissingField {
                field: def.name.clone(),
            })?;
            if value.field_type() != Some(def.field_type) {
                return Err(FrameError::TypeMismatch {
                    field: def.name.clone(),
                    expected: def.field_type,
                });
            }
        }
        Ok(())
    }

    fn read_record<B: AsRef<[u8]>>(&self, cursor: &mut ByteCursor<B>) -> Result<Record> {
        let result = self.read_fields(cursor);
        match &result {
            Ok(_) => tracing::trace!(
                fields = self.fields.len(),
                bytes = cursor.len(),
                "Deserialized frame"
            ),
            Err(e) => tracing::debug!(error = %e, bytes = cursor.len(), "Rejected frame"),
        }
        result
    }

    fn read_fields<B: AsRef<[u8]>>(&self, cursor: &mut ByteCursor<B>) -> Result<Record> {
        let mut record = Record::with_capacity(self.fields.len());
        for def in &self.fields {
            let value = self.read_field(cursor, def.field_type)?;
            record.insert(def.name.as_str(), value);
        }
        ensure_finished(cursor)?;
        Ok(record)
    }

    fn write_field(
        &self,
        cursor: &mut ByteCursor<Vec<u8>>,
        name: &str,
        field_type: FieldType,
        value: &Value,
    ) -> Result<()> {
        match (field_type, value) {
            (FieldType::UnsignedLong, Value::UnsignedLong(v)) => {
                cursor.write_u64(*v)?;
            }
            (FieldType::UnsignedInt, Value::Number(n)) => {
                cursor.write_u32(check_unsigned_int(*n)?)?;
            }
            (FieldType::Text, Value::Text(s)) => {
                cursor.write_text(s, &self.codec)?;
            }
            (FieldType::Flag, Value::Flag(b)) => {
                cursor.write_flag(*b)?;
            }
            (expected, _) => {
                return Err(FrameError::TypeMismatch {
                    field: name.to_owned(),
                    expected,
                });
            }
        }
        Ok(())
    }

    fn read_field<B: AsRef<[u8]>>(
        &self,
        cursor: &mut ByteCursor<B>,
        field_type: FieldType,
    ) -> Result<Value> {
        Ok(match field_type {
            FieldType::UnsignedLong => Value::UnsignedLong(cursor.read_u64()?),
            FieldType::UnsignedInt => Value::Number(i64::from(cursor.read_u32()?)),
            FieldType::Text => Value::Text(cursor.read_text(&self.codec)?),
            FieldType::Flag => Value::Flag(cursor.read_flag()?),
        })
    }
}

/// Fail with a length mismatch unless every byte of the cursor was consumed
pub(crate) fn ensure_finished<B: AsRef<[u8]>>(cursor: &ByteCursor<B>) -> Result<()> {
    if !cursor.is_finished() {
        return Err(FrameError::TrailingBytes {
            remaining: cursor.remaining(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::text::LossyUtf8;

    fn user_frame() -> Frame {
        Frame::new(
            FieldDefinitions::builder()
                .field("name", FieldType::Text)
                .field("age", FieldType::UnsignedInt)
                .field("isAdmin", FieldType::Flag)
                .build()
                .unwrap(),
        )
    }

    fn kane() -> Record {
        Record::new()
            .with("name", "Kane")
            .with("age", 20u32)
            .with("isAdmin", false)
    }

    #[test]
    fn test_user_record_layout() {
        let frame = user_frame();
        let bytes = frame.serialize(&kane()).unwrap();

        assert_eq!(bytes.len(), 10);
        assert_eq!(bytes, [4, b'K', b'a', b'n', b'e', 0, 0, 0, 20, 0]);
        assert_eq!(frame.deserialize(&bytes).unwrap(), kane());
    }

    #[test]
    fn test_wire_order_follows_schema_not_record() {
        let frame = user_frame();
        let shuffled = Record::new()
            .with("isAdmin", true)
            .with("age", 1u32)
            .with("name", "a");

        let bytes = frame.serialize(&shuffled).unwrap();
        let mut cursor = ByteCursor::new(&bytes[..]);
        assert_eq!(cursor.read_text(&Utf8).unwrap(), "a");
        assert_eq!(cursor.read_u32().unwrap(), 1);
        assert!(cursor.read_flag().unwrap());
        assert!(cursor.is_finished());

        let decoded = frame.deserialize(&bytes).unwrap();
        assert_eq!(decoded.keys().collect::<Vec<_>>(), ["name", "age", "isAdmin"]);
    }

    #[test]
    fn test_type_mismatch_names_field() {
        let frame = user_frame();
        let record = kane().with("isAdmin", 1u32);

        let err = frame.serialize(&record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(
            err,
            FrameError::TypeMismatch { ref field, expected: FieldType::Flag } if field == "isAdmin"
        ));
    }

    #[test]
    fn test_missing_and_unknown_fields() {
        let frame = user_frame();

        let mut missing = kane();
        missing.remove("age");
        assert!(matches!(
            frame.serialize(&missing),
            Err(FrameError::MissingField { field }) if field == "age"
        ));

        let extra = kane().with("email", "k@example.com");
        assert!(matches!(
            frame.serialize(&extra),
            Err(FrameError::UnknownField { field }) if field == "email"
        ));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let frame = user_frame();
        let mut bytes = frame.serialize(&kane()).unwrap();
        bytes.push(0);

        let err = frame.deserialize(&bytes).unwrap_err();
        assert!(matches!(err, FrameError::TrailingBytes { remaining: 1 }));
    }

    #[test]
    fn test_truncated_input_rejected() {
        let frame = user_frame();
        let bytes = frame.serialize(&kane()).unwrap();

        for len in 0..bytes.len() {
            let err = frame.deserialize(&bytes[..len]).unwrap_err();
            assert!(
                matches!(err.kind(), ErrorKind::Bounds | ErrorKind::Format),
                "unexpected error for {len} bytes: {err}"
            );
        }
    }

    #[test]
    fn test_deserialize_from_resets_cursor() {
        let frame = user_frame();
        let bytes = frame.serialize(&kane()).unwrap();
        let mut cursor = ByteCursor::new(bytes.as_slice());

        assert_eq!(frame.deserialize_from(&mut cursor).unwrap(), kane());
        assert!(cursor.is_finished());
        // Second pass over the same cursor starts from the beginning again
        assert_eq!(frame.deserialize_from(&mut cursor).unwrap(), kane());
    }

    #[test]
    fn test_lossy_text_codec() {
        let fields = FieldDefinitions::try_from_iter([("label", FieldType::Text)]).unwrap();
        let strict = Frame::new(fields.clone());
        let lossy = Frame::with_text_codec(fields, LossyUtf8);

        let bytes = [2u8, 0x68, 0xFF];
        assert!(matches!(
            strict.deserialize(&bytes),
            Err(FrameError::InvalidText(_))
        ));
        let record = lossy.deserialize(&bytes).unwrap();
        assert_eq!(record.get("label").and_then(Value::as_str), Some("h\u{FFFD}"));
    }

    /// Reports three more bytes than it encodes
    struct PaddedLen;

    impl TextCodec for PaddedLen {
        fn encode<'a>(&self, text: &'a str) -> std::borrow::Cow<'a, [u8]> {
            Utf8.encode(text)
        }

        fn decode(&self, bytes: &[u8]) -> Result<String> {
            Utf8.decode(bytes)
        }

        fn encoded_len(&self, text: &str) -> usize {
            text.len() + 3
        }
    }

    #[test]
    fn test_over_reported_text_size_is_an_error() {
        let fields = FieldDefinitions::try_from_iter([("label", FieldType::Text)]).unwrap();
        let frame = Frame::with_text_codec(fields, PaddedLen);
        let record = Record::new().with("label", "ab");

        assert_eq!(frame.encoded_size(&record).unwrap(), 6);
        let err = frame.serialize(&record).unwrap_err();
        assert!(matches!(err, FrameError::TrailingBytes { remaining: 3 }));
    }

    #[test]
    fn test_type_checked_before_sizing() {
        let frame = user_frame();

        // A negative number would otherwise fail the range check first
        let err = frame
            .serialize(&kane().with("isAdmin", Value::Number(-1)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = frame
            .encoded_size(&kane().with("name", vec![Value::from("Kane")]))
            .unwrap_err();
        assert!(matches!(
            err,
            FrameError::TypeMismatch { ref field, expected: FieldType::Text } if field == "name"
        ));
    }

    #[test]
    fn test_empty_schema() {
        let frame = Frame::new(FieldDefinitions::default());
        assert!(frame.serialize(&Record::new()).unwrap().is_empty());
        assert_eq!(frame.deserialize(&[]).unwrap(), Record::new());
        assert!(frame.deserialize(&[0]).is_err());
    }
}
