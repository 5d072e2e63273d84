//! Converted block values.
//!
//! Conversion turns the raw submitted JSON into typed values. A leaf block
//! yields a scalar; a composite yields a [`StructValue`], an ordered list of
//! `field name → value` pairs that preserves field *declaration* order no
//! matter how the raw mapping iterated. Both serialize back into plain JSON
//! shapes for template execution.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A converted value produced by a block's conversion step.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockValue {
    /// No value (unset optional field).
    Null,
    /// A leaf value: text, number, boolean.
    Scalar(serde_json::Value),
    /// A composite value with ordered named fields.
    Struct(StructValue),
}

impl BlockValue {
    /// The contained text, when this is a string scalar.
    pub fn text(&self) -> Option<&str> {
        match self {
            BlockValue::Scalar(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, BlockValue::Null)
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            BlockValue::Struct(value) => Some(value),
            _ => None,
        }
    }
}

impl Serialize for BlockValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BlockValue::Null => serializer.serialize_none(),
            BlockValue::Scalar(value) => value.serialize(serializer),
            BlockValue::Struct(value) => value.serialize(serializer),
        }
    }
}

impl From<serde_json::Value> for BlockValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => BlockValue::Null,
            other => BlockValue::Scalar(other),
        }
    }
}

/// An ordered `field name → BlockValue` structure.
///
/// Field order is the owning struct's declaration order. Serializes as a map
/// in that order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructValue {
    fields: Vec<(String, BlockValue)>,
}

impl StructValue {
    pub fn new(fields: Vec<(String, BlockValue)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&BlockValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// The text of a string-scalar field, if present.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(BlockValue::text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BlockValue)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for StructValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_accessor() {
        let value = BlockValue::Scalar(json!("hello"));
        assert_eq!(value.text(), Some("hello"));
        assert_eq!(BlockValue::Null.text(), None);
        assert_eq!(BlockValue::Scalar(json!(3)).text(), None);
    }

    #[test]
    fn test_struct_get_and_order() {
        let value = StructValue::new(vec![
            ("zebra".into(), BlockValue::Scalar(json!(1))),
            ("apple".into(), BlockValue::Scalar(json!(2))),
        ]);

        assert_eq!(value.get("apple"), Some(&BlockValue::Scalar(json!(2))));
        assert_eq!(value.get("missing"), None);

        let names: Vec<&str> = value.field_names().collect();
        assert_eq!(names, vec!["zebra", "apple"]);
    }

    #[test]
    fn test_struct_serializes_in_order() {
        let value = StructValue::new(vec![
            ("b".into(), BlockValue::Scalar(json!("x"))),
            ("a".into(), BlockValue::Null),
        ]);

        let serialized = serde_json::to_string(&value).unwrap();
        assert_eq!(serialized, r#"{"b":"x","a":null}"#);
    }

    #[test]
    fn test_from_json_value() {
        assert!(BlockValue::from(json!(null)).is_null());
        assert_eq!(BlockValue::from(json!("t")).text(), Some("t"));
    }
}
