//! Field types and ordered field definitions

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};

/// Wire kind of a single field
///
/// The discriminants are the public numeric codes of the field types.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// 8 bytes, big-endian unsigned
    UnsignedLong = 1,
    /// 4 bytes, big-endian unsigned
    UnsignedInt = 2,
    /// 1-byte length prefix + up to 255 UTF-8 bytes
    Text = 3,
    /// 1 byte, 0 or 1
    Flag = 4,
}

impl FieldType {
    pub const ALL: [FieldType; 4] = [
        FieldType::UnsignedLong,
        FieldType::UnsignedInt,
        FieldType::Text,
        FieldType::Flag,
    ];

    /// Numeric type code
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a type by its numeric code
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(Self::UnsignedLong),
            2 => Ok(Self::UnsignedInt),
            3 => Ok(Self::Text),
            4 => Ok(Self::Flag),
            other => Err(FrameError::UnknownFieldType(other)),
        }
    }

    /// Fixed wire width in bytes, `None` for length-prefixed kinds
    pub fn wire_width(self) -> Option<usize> {
        match self {
            FieldType::UnsignedLong => Some(8),
            FieldType::UnsignedInt => Some(4),
            FieldType::Text => None,
            FieldType::Flag => Some(1),
        }
    }

    /// Smallest possible encoding of this kind
    pub fn min_width(self) -> usize {
        self.wire_width().unwrap_or(1)
    }

    /// Name used in schema files
    pub fn name(self) -> &'static str {
        match self {
            FieldType::UnsignedLong => "unsigned_long",
            FieldType::UnsignedInt => "unsigned_int",
            FieldType::Text => "text",
            FieldType::Flag => "flag",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for FieldType {
    type Error = FrameError;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_code(code)
    }
}

/// A named slot in a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
}

/// Ordered, immutable field-name to field-type mapping
///
/// Declaration order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldDefinitions {
    fields: Vec<FieldDef>,
}

impl FieldDefinitions {
    /// Start building definitions field by field
    pub fn builder() -> FieldDefinitionsBuilder {
        FieldDefinitionsBuilder::default()
    }

    /// Build from `(name, type)` pairs, rejecting duplicate names
    pub fn try_from_iter<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, FieldType)>,
        S: Into<String>,
    {
        let mut defs: Vec<FieldDef> = Vec::new();
        for (name, field_type) in fields {
            let name = name.into();
            if defs.iter().any(|d| d.name == name) {
                return Err(FrameError::DuplicateField(name));
            }
            defs.push(FieldDef { name, field_type });
        }
        Ok(Self { fields: defs })
    }

    /// Fields in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDef> {
        self.fields.iter()
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no fields are declared
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Declared type of `name`, if it is part of the schema
    pub fn get(&self, name: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.field_type)
    }

    /// True if `name` is a declared field
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Encoded size of every record, if the schema has no variable-width fields
    pub fn fixed_size(&self) -> Option<usize> {
        self.fields.iter().map(|d| d.field_type.wire_width()).sum()
    }

    /// Smallest encoded size a record of this schema can have
    pub fn min_size(&self) -> usize {
        self.fields.iter().map(|d| d.field_type.min_width()).sum()
    }
}

impl<'a> IntoIterator for &'a FieldDefinitions {
    type Item = &'a FieldDef;
    type IntoIter = std::slice::Iter<'a, FieldDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Incremental construction of [`FieldDefinitions`]
#[derive(Debug, Default)]
pub struct FieldDefinitionsBuilder {
    fields: Vec<(String, FieldType)>,
}

impl FieldDefinitionsBuilder {
    /// Append a field after those already added
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push((name.into(), field_type));
        self
    }

    /// Finish, rejecting duplicate names
    pub fn build(self) -> Result<FieldDefinitions> {
        FieldDefinitions::try_from_iter(self.fields)
    }
}
