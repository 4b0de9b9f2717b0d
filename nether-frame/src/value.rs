//! Dynamic values and records

use crate::schema::FieldType;

/// A value that can be sized and, for the primitive kinds, encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Unsigned 64-bit integer, encoded as `UnsignedLong`
    UnsignedLong(u64),
    /// Plain number, encoded as `UnsignedInt` once range-checked
    Number(i64),
    Text(String),
    Flag(bool),
    /// Ordered sequence
    List(Vec<Value>),
    /// Flat mapping of primitives
    Map(Record),
}

impl Value {
    /// Short name of the value kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::UnsignedLong(_) => "unsigned_long",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Flag(_) => "flag",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// The field type a primitive value encodes as
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Value::UnsignedLong(_) => Some(FieldType::UnsignedLong),
            Value::Number(_) => Some(FieldType::UnsignedInt),
            Value::Text(_) => Some(FieldType::Text),
            Value::Flag(_) => Some(FieldType::Flag),
            Value::List(_) | Value::Map(_) => None,
        }
    }

    /// True for the four kinds a field can hold directly
    pub fn is_primitive(&self) -> bool {
        self.field_type().is_some()
    }

    /// The value of an `UnsignedLong`
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UnsignedLong(v) => Some(*v),
            _ => None,
        }
    }

    /// The value of a `Number`
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// The contents of a `Text`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value of a `Flag`
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UnsignedLong(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Number(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(i64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Flag(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Map(v)
    }
}

/// Flat name-to-value mapping
///
/// Keeps insertion order for iteration; equality ignores order.
#[derive(Debug, Clone, Default, Eq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a value, returning the previous one
    ///
    /// A replaced entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Value stored under `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// True if `name` has a value
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove `name`, returning its value
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the record has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_equality_ignores_order() {
        let a = Record::new().with("x", 1u32).with("y", true);
        let b = Record::new().with("y", true).with("x", 1u32);
        assert_eq!(a, b);

        let c = Record::new().with("x", 2u32).with("y", true);
        assert_ne!(a, c);
        assert_ne!(a, Record::new().with("x", 1u32));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record = Record::new().with("a", "one").with("b", "two");
        let old = record.insert("a", "uno");
        assert_eq!(old, Some(Value::Text("one".into())));
        assert_eq!(record.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(record.get("a").and_then(Value::as_str), Some("uno"));
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(5u64), Value::UnsignedLong(5));
        assert_eq!(Value::from(5u32), Value::Number(5));
        assert_eq!(Value::from(-5), Value::Number(-5));
        assert_eq!(Value::from("hi").field_type(), Some(FieldType::Text));
        assert_eq!(Value::List(vec![]).field_type(), None);
        assert!(!Value::Map(Record::new()).is_primitive());
    }
}
