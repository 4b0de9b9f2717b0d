//! Schema files
//!
//! Field definitions can be kept next to the data they describe, in TOML or
//! JSON. Each field is one entry of the `field` array; order in the file is
//! wire order.
//!
//! ```toml
//! [[field]]
//! name = "name"
//! type = "text"
//!
//! [[field]]
//! name = "age"
//! type = 2          # numeric codes are accepted too
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};
use crate::schema::{FieldDefinitions, FieldType};

/// On-disk form of a [`FieldDefinitions`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaFile {
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldSpec>,
}

/// One `[[field]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldTypeSpec,
}

/// Field type written either by name or by numeric code
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldTypeSpec {
    Code(u8),
    Name(FieldType),
}

impl FieldTypeSpec {
    pub fn resolve(self) -> Result<FieldType> {
        match self {
            FieldTypeSpec::Code(code) => FieldType::from_code(code),
            FieldTypeSpec::Name(ty) => Ok(ty),
        }
    }
}

impl SchemaFile {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a `.toml` or `.json` schema file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let schema = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&contents)?,
            Some("json") => Self::from_json_str(&contents)?,
            other => {
                return Err(FrameError::SchemaFile(format!(
                    "unsupported schema file extension: {}",
                    other.unwrap_or("<none>")
                )));
            }
        };
        tracing::debug!(path = %path.display(), fields = schema.fields.len(), "Loaded schema file");
        Ok(schema)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| FrameError::SchemaFile(e.to_string()))
    }

    /// Validate and convert into field definitions
    pub fn definitions(&self) -> Result<FieldDefinitions> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for spec in &self.fields {
            fields.push((spec.name.as_str(), spec.field_type.resolve()?));
        }
        FieldDefinitions::try_from_iter(fields)
    }
}

impl From<&FieldDefinitions> for SchemaFile {
    fn from(defs: &FieldDefinitions) -> Self {
        Self {
            fields: defs
                .iter()
                .map(|d| FieldSpec {
                    name: d.name.clone(),
                    field_type: FieldTypeSpec::Name(d.field_type),
                })
                .collect(),
        }
    }
}

impl FieldDefinitions {
    /// Load field definitions from a `.toml` or `.json` schema file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        SchemaFile::load(path)?.definitions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_TOML: &str = r#"
[[field]]
name = "name"
type = "text"

[[field]]
name = "age"
type = 2

[[field]]
name = "isAdmin"
type = "flag"
"#;

    #[test]
    fn test_parse_toml() {
        let defs = SchemaFile::from_toml_str(USER_TOML)
            .unwrap()
            .definitions()
            .unwrap();
        let got: Vec<(&str, FieldType)> =
            defs.iter().map(|d| (d.name.as_str(), d.field_type)).collect();
        assert_eq!(
            got,
            [
                ("name", FieldType::Text),
                ("age", FieldType::UnsignedInt),
                ("isAdmin", FieldType::Flag),
            ]
        );
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"field":[{"name":"id","type":"unsigned_long"},{"name":"n","type":2}]}"#;
        let defs = SchemaFile::from_json_str(json).unwrap().definitions().unwrap();
        assert_eq!(defs.get("id"), Some(FieldType::UnsignedLong));
        assert_eq!(defs.get("n"), Some(FieldType::UnsignedInt));
    }

    #[test]
    fn test_unknown_type_code() {
        let toml = "[[field]]\nname = \"x\"\ntype = 9\n";
        let err = SchemaFile::from_toml_str(toml)
            .unwrap()
            .definitions()
            .unwrap_err();
        assert!(matches!(err, FrameError::UnknownFieldType(9)));
    }

    #[test]
    fn test_unknown_type_name() {
        let toml = "[[field]]\nname = \"x\"\ntype = \"float\"\n";
        assert!(matches!(
            SchemaFile::from_toml_str(toml),
            Err(FrameError::SchemaFile(_))
        ));
    }

    #[test]
    fn test_duplicate_in_file() {
        let toml = "[[field]]\nname = \"x\"\ntype = \"flag\"\n[[field]]\nname = \"x\"\ntype = \"text\"\n";
        let err = SchemaFile::from_toml_str(toml)
            .unwrap()
            .definitions()
            .unwrap_err();
        assert!(matches!(err, FrameError::DuplicateField(_)));
    }

    #[test]
    fn test_toml_roundtrip_of_definitions() {
        let defs = SchemaFile::from_toml_str(USER_TOML)
            .unwrap()
            .definitions()
            .unwrap();
        let written = SchemaFile::from(&defs).to_toml_string().unwrap();
        let reparsed = SchemaFile::from_toml_str(&written)
            .unwrap()
            .definitions()
            .unwrap();
        assert_eq!(reparsed, defs);
    }
}
