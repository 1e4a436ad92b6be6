//! Insertion-ordered bags of named values

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{MapperError, Result};
use crate::types::Value;

/// Attribute name to value mapping, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueBag {
    entries: IndexMap<String, Value>,
}

impl ValueBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder style); re-inserting a name keeps its original position
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Values in insertion order, for ordered resolution
    pub fn to_values(&self) -> Vec<Value> {
        self.entries.values().cloned().collect()
    }

    /// Build a bag from a JSON object, keeping its member order
    ///
    /// Integers become `Int` when they fit 32 bits and `Long` otherwise; any
    /// other number becomes `Double`. Integers beyond 64 signed bits, null,
    /// array and object members are rejected.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let object = json
            .as_object()
            .ok_or_else(|| MapperError::validation("Values must be a JSON object"))?;

        let mut bag = ValueBag::new();
        for (name, member) in object {
            let value = match member {
                serde_json::Value::Bool(b) => Value::Boolean(*b),
                serde_json::Value::String(s) => Value::Text(s.clone()),
                serde_json::Value::Number(n) => match n.as_i64() {
                    Some(i) => i32::try_from(i)
                        .map(Value::Int)
                        .unwrap_or(Value::Long(i)),
                    None if n.is_u64() => {
                        return Err(MapperError::validation(format!(
                            "Value for '{}' is out of range: {}",
                            name, n
                        )));
                    }
                    None => n.as_f64().map(Value::Double).ok_or_else(|| {
                        MapperError::validation(format!(
                            "Value for '{}' is out of range: {}",
                            name, n
                        ))
                    })?,
                },
                other => {
                    return Err(MapperError::validation(format!(
                        "Unsupported value for '{}': {}",
                        name, other
                    )));
                }
            };
            bag.insert(name.clone(), value);
        }

        Ok(bag)
    }

    /// Parse a JSON document and build a bag from it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json(&parsed)
    }
}

impl<K, V> FromIterator<(K, V)> for ValueBag
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = ValueBag::new();
        for (name, value) in iter {
            bag.insert(name, value);
        }
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_insertion_order() {
        let bag = ValueBag::new()
            .with("label", "Pen")
            .with("price", 1.5)
            .with("id", 7);

        let names: Vec<&str> = bag.names().collect();
        assert_eq!(names, vec!["label", "price", "id"]);
        assert_eq!(
            bag.to_values(),
            vec![Value::from("Pen"), Value::Double(1.5), Value::Int(7)]
        );
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut bag = ValueBag::new().with("a", 1).with("b", 2);
        let previous = bag.insert("a", 3);
        assert_eq!(previous, Some(Value::Int(1)));
        let values: Vec<&Value> = bag.values().collect();
        assert_eq!(values, vec![&Value::Int(3), &Value::Int(2)]);
    }

    #[test]
    fn test_from_iterator() {
        let bag: ValueBag = vec![("x", 1), ("y", 2)].into_iter().collect();
        assert_eq!(bag.len(), 2);
        assert_eq!(bag.get("y"), Some(&Value::Int(2)));
    }

    // =========================================================================
    // JSON Intake Tests
    // =========================================================================

    #[test]
    fn test_from_json_types() {
        let bag = ValueBag::from_json(&serde_json::json!({
            "id": 7,
            "serial": 9_000_000_000_i64,
            "price": 1.5,
            "label": "Pen",
            "active": true
        }))
        .unwrap();

        assert_eq!(bag.get("id"), Some(&Value::Int(7)));
        assert_eq!(bag.get("serial"), Some(&Value::Long(9_000_000_000)));
        assert_eq!(bag.get("price"), Some(&Value::Double(1.5)));
        assert_eq!(bag.get("label"), Some(&Value::from("Pen")));
        assert_eq!(bag.get("active"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = ValueBag::from_json(&serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, MapperError::Validation(_)));
    }

    #[test]
    fn test_from_json_rejects_null_member() {
        let err = ValueBag::from_json(&serde_json::json!({"label": null})).unwrap_err();
        assert!(err.to_string().contains("label"));
    }

    #[test]
    fn test_from_json_rejects_integer_beyond_long() {
        let err = ValueBag::from_json(&serde_json::json!({"serial": u64::MAX})).unwrap_err();
        assert!(matches!(err, MapperError::Validation(_)));
        assert!(err.to_string().contains("serial"));
    }

    #[test]
    fn test_from_json_str_parse_error() {
        let err = ValueBag::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, MapperError::Json(_)));
    }

    #[test]
    fn test_empty_bag() {
        let bag = ValueBag::new();
        assert!(bag.is_empty());
        assert_eq!(bag.iter().count(), 0);
    }
}
