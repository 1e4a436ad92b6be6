//! Core type definitions for the mapper
//!
//! Includes declared field types, runtime values, and per-attribute metadata overrides.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ArgError;

// ============================================================================
// Declared Types
// ============================================================================

/// Primitive kinds, each of which also exists in a boxed form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Int,
    Long,
    Short,
    Byte,
    Float,
    Double,
    Boolean,
    Char,
}

impl Primitive {
    /// Primitive type name, e.g. `int`
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Short => "short",
            Primitive::Byte => "byte",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Boolean => "boolean",
            Primitive::Char => "char",
        }
    }

    /// Boxed type name, e.g. `Integer`
    pub fn boxed_name(&self) -> &'static str {
        match self {
            Primitive::Int => "Integer",
            Primitive::Long => "Long",
            Primitive::Short => "Short",
            Primitive::Byte => "Byte",
            Primitive::Float => "Float",
            Primitive::Double => "Double",
            Primitive::Boolean => "Boolean",
            Primitive::Char => "Character",
        }
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            Primitive::Int | Primitive::Long | Primitive::Short | Primitive::Byte
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, Primitive::Float | Primitive::Double)
    }
}

/// Declared type of an attribute or constructor parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// Unboxed primitive (`int`, `double`, ...)
    Primitive(Primitive),
    /// Boxed primitive (`Integer`, `Double`, ...)
    Boxed(Primitive),
    /// Text (`String`)
    Text,
    /// Any other named type; not mappable to a column
    Other(String),
}

impl FieldType {
    pub const INT: FieldType = FieldType::Primitive(Primitive::Int);
    pub const LONG: FieldType = FieldType::Primitive(Primitive::Long);
    pub const SHORT: FieldType = FieldType::Primitive(Primitive::Short);
    pub const BYTE: FieldType = FieldType::Primitive(Primitive::Byte);
    pub const FLOAT: FieldType = FieldType::Primitive(Primitive::Float);
    pub const DOUBLE: FieldType = FieldType::Primitive(Primitive::Double);
    pub const BOOLEAN: FieldType = FieldType::Primitive(Primitive::Boolean);
    pub const CHAR: FieldType = FieldType::Primitive(Primitive::Char);
    pub const TEXT: FieldType = FieldType::Text;

    /// Create an unsupported named type
    pub fn other(name: impl Into<String>) -> Self {
        FieldType::Other(name.into())
    }

    /// Simple type name (`int`, `Integer`, `String`, or the custom name)
    pub fn simple_name(&self) -> &str {
        match self {
            FieldType::Primitive(p) => p.name(),
            FieldType::Boxed(p) => p.boxed_name(),
            FieldType::Text => "String",
            FieldType::Other(name) => name,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, FieldType::Primitive(_))
    }

    /// Underlying primitive kind of a primitive or boxed type
    pub fn primitive(&self) -> Option<Primitive> {
        match self {
            FieldType::Primitive(p) | FieldType::Boxed(p) => Some(*p),
            _ => None,
        }
    }

    /// Whether a value of runtime type `value_type` can be passed where `self`
    /// is declared.
    ///
    /// Compatible when the types are equal, when `self` is primitive and the
    /// value's type name matches the primitive name ignoring case
    /// (`double`/`Double`), or when `self` is `int` and the value is an
    /// `Integer`. No numeric widening is performed.
    pub fn accepts(&self, value_type: &FieldType) -> bool {
        if self == value_type {
            return true;
        }
        if !self.is_primitive() {
            return false;
        }
        let value_name = value_type.simple_name();
        self.simple_name().eq_ignore_ascii_case(value_name)
            || (*self == FieldType::INT && value_name == "Integer")
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.simple_name())
    }
}

// ============================================================================
// Runtime Values
// ============================================================================

/// A runtime value; its type is always the boxed form of its kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    Int(i32),
    Long(i64),
    Short(i16),
    Byte(i8),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Char(char),
    Text(String),
    /// Value of a type the mapper cannot render as a column
    Object { type_name: String, repr: String },
}

impl Value {
    /// Runtime type of this value
    pub fn value_type(&self) -> FieldType {
        match self {
            Value::Int(_) => FieldType::Boxed(Primitive::Int),
            Value::Long(_) => FieldType::Boxed(Primitive::Long),
            Value::Short(_) => FieldType::Boxed(Primitive::Short),
            Value::Byte(_) => FieldType::Boxed(Primitive::Byte),
            Value::Float(_) => FieldType::Boxed(Primitive::Float),
            Value::Double(_) => FieldType::Boxed(Primitive::Double),
            Value::Boolean(_) => FieldType::Boxed(Primitive::Boolean),
            Value::Char(_) => FieldType::Boxed(Primitive::Char),
            Value::Text(_) => FieldType::Text,
            Value::Object { type_name, .. } => FieldType::Other(type_name.clone()),
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Natural string form: floats always keep a fractional part (`2.0`)
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Double(v) => write!(f, "{:?}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::Object { repr, .. } => f.write_str(repr),
        }
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_value_from! {
    i32 => Int,
    i64 => Long,
    i16 => Short,
    i8 => Byte,
    f32 => Float,
    f64 => Double,
    bool => Boolean,
    char => Char,
    String => Text,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

macro_rules! impl_try_from_value {
    ($($ty:ty => $variant:ident, $expected:literal),* $(,)?) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = ArgError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(ArgError::Mismatch {
                            position: 0,
                            expected: $expected,
                            found: other.value_type().simple_name().to_string(),
                        }),
                    }
                }
            }
        )*
    };
}

impl_try_from_value! {
    i32 => Int, "int",
    i64 => Long, "long",
    i16 => Short, "short",
    i8 => Byte, "byte",
    f32 => Float, "float",
    f64 => Double, "double",
    bool => Boolean, "boolean",
    char => Char, "char",
    String => Text, "String",
}

// ============================================================================
// Attribute Metadata Override
// ============================================================================

fn default_semantic_type() -> String {
    "null".to_string()
}

fn default_length() -> u32 {
    100
}

fn default_optional() -> bool {
    true
}

/// Declarative per-attribute override
///
/// A semantic type name of `"null"` means "no override"; the declared type of
/// the attribute then governs column mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeMeta {
    /// Semantic type name, e.g. `String`, `Integer`
    #[serde(rename = "type", default = "default_semantic_type")]
    pub type_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Declared length for text columns (default: 100)
    #[serde(default = "default_length")]
    pub length: u32,

    /// Whether the attribute may be left unset (default: true)
    #[serde(default = "default_optional")]
    pub optional: bool,
}

impl Default for AttributeMeta {
    fn default() -> Self {
        Self {
            type_name: default_semantic_type(),
            min: None,
            max: None,
            length: default_length(),
            optional: default_optional(),
        }
    }
}

impl AttributeMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a `String` override with the given length
    pub fn text(length: u32) -> Self {
        Self::new().semantic_type("String").length(length)
    }

    pub fn semantic_type(mut self, name: impl Into<String>) -> Self {
        self.type_name = name.into();
        self
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn required(mut self) -> Self {
        self.optional = false;
        self
    }

    /// The overriding type name, if one is set
    pub fn semantic_type_name(&self) -> Option<&str> {
        match self.type_name.as_str() {
            "null" => None,
            name => Some(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Coercion Tests
    // =========================================================================

    #[test]
    fn test_exact_match_accepted() {
        assert!(FieldType::TEXT.accepts(&FieldType::Text));
        assert!(FieldType::Boxed(Primitive::Int).accepts(&FieldType::Boxed(Primitive::Int)));
        assert!(FieldType::other("Date").accepts(&FieldType::other("Date")));
    }

    #[test]
    fn test_primitive_accepts_boxed_by_name() {
        assert!(FieldType::DOUBLE.accepts(&Value::Double(1.5).value_type()));
        assert!(FieldType::BOOLEAN.accepts(&Value::Boolean(true).value_type()));
        assert!(FieldType::LONG.accepts(&Value::Long(1).value_type()));
        assert!(FieldType::FLOAT.accepts(&Value::Float(1.0).value_type()));
    }

    #[test]
    fn test_int_accepts_integer() {
        assert!(FieldType::INT.accepts(&Value::Int(7).value_type()));
    }

    #[test]
    fn test_char_does_not_accept_character() {
        // `Character` is neither a case-insensitive match of `char` nor `Integer`
        assert!(!FieldType::CHAR.accepts(&Value::Char('x').value_type()));
    }

    #[test]
    fn test_no_widening() {
        assert!(!FieldType::DOUBLE.accepts(&Value::Int(1).value_type()));
        assert!(!FieldType::LONG.accepts(&Value::Int(1).value_type()));
        assert!(!FieldType::INT.accepts(&Value::Long(1).value_type()));
    }

    #[test]
    fn test_boxed_does_not_accept_other_boxed() {
        let integer = FieldType::Boxed(Primitive::Int);
        assert!(!integer.accepts(&Value::Long(1).value_type()));
        assert!(!integer.accepts(&FieldType::INT));
    }

    #[test]
    fn test_text_only_accepts_text() {
        assert!(!FieldType::TEXT.accepts(&Value::Int(1).value_type()));
        assert!(!FieldType::INT.accepts(&Value::from("7").value_type()));
    }

    // =========================================================================
    // Name Tests
    // =========================================================================

    #[test]
    fn test_simple_names() {
        assert_eq!(FieldType::INT.simple_name(), "int");
        assert_eq!(FieldType::Boxed(Primitive::Int).simple_name(), "Integer");
        assert_eq!(FieldType::Boxed(Primitive::Char).simple_name(), "Character");
        assert_eq!(FieldType::TEXT.simple_name(), "String");
        assert_eq!(FieldType::other("Date").simple_name(), "Date");
        assert_eq!(FieldType::DOUBLE.to_string(), "double");
    }

    // =========================================================================
    // Value Tests
    // =========================================================================

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int(7).to_string(), "7");
        assert_eq!(Value::Double(1.5).to_string(), "1.5");
        assert_eq!(Value::Double(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::from("O'Brien").to_string(), "O'Brien");
    }

    #[test]
    fn test_value_from_conversions() {
        assert_eq!(Value::from(7), Value::Int(7));
        assert_eq!(Value::from(7_i64), Value::Long(7));
        assert_eq!(Value::from(1.5), Value::Double(1.5));
        assert_eq!(Value::from("Pen"), Value::Text("Pen".to_string()));
        assert_eq!(Value::from(true).as_bool(), Some(true));
    }

    #[test]
    fn test_try_from_value() {
        let label: String = Value::from("Pen").try_into().unwrap();
        assert_eq!(label, "Pen");

        let err = i32::try_from(Value::Long(3)).unwrap_err();
        assert_eq!(
            err,
            ArgError::Mismatch {
                position: 0,
                expected: "int",
                found: "Long".to_string(),
            }
        );
    }

    #[test]
    fn test_value_accessors_are_strict() {
        assert_eq!(Value::Int(3).as_long(), None);
        assert_eq!(Value::Float(1.0).as_double(), None);
        assert_eq!(Value::from("x").as_int(), None);
        assert_eq!(Value::Float(1.5).as_float(), Some(1.5));
        assert_eq!(Value::Double(1.5).as_float(), None);
    }

    #[test]
    fn test_primitive_categories() {
        assert!(Primitive::Byte.is_integral());
        assert!(Primitive::Long.is_integral());
        assert!(!Primitive::Float.is_integral());
        assert!(Primitive::Double.is_floating());
        assert!(!Primitive::Boolean.is_floating());
        assert!(!Primitive::Char.is_integral() && !Primitive::Char.is_floating());
    }

    // =========================================================================
    // AttributeMeta Tests
    // =========================================================================

    #[test]
    fn test_meta_defaults() {
        let meta = AttributeMeta::new();
        assert_eq!(meta.semantic_type_name(), None);
        assert_eq!(meta.length, 100);
        assert!(meta.optional);
        assert!(meta.min.is_none());
    }

    #[test]
    fn test_meta_text_shorthand() {
        let meta = AttributeMeta::text(50).required();
        assert_eq!(meta.semantic_type_name(), Some("String"));
        assert_eq!(meta.length, 50);
        assert!(!meta.optional);
    }

    #[test]
    fn test_meta_deserialization_defaults() {
        let meta: AttributeMeta = serde_json::from_str(r#"{"min": 1}"#).unwrap();
        assert_eq!(meta.type_name, "null");
        assert_eq!(meta.min, Some(1.0));
        assert_eq!(meta.length, 100);
        assert!(meta.optional);
    }

    #[test]
    fn test_meta_deserialization_override() {
        let json = r#"{"type":"Double","min":1000,"max":2000,"optional":false}"#;
        let meta: AttributeMeta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.semantic_type_name(), Some("Double"));
        assert_eq!(meta.max, Some(2000.0));
        assert!(!meta.optional);
    }

    #[test]
    fn test_meta_serialization() {
        let json = serde_json::to_string(&AttributeMeta::text(20)).unwrap();
        assert!(json.contains("\"type\":\"String\""));
        assert!(json.contains("\"length\":20"));
        assert!(!json.contains("\"min\""));
    }
}
