use chrono::DateTime;
use serde_json::Value;
use std::fmt;

/// Primitive type tags understood by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    Object,
    Array,
    /// An RFC 3339 timestamp carried as a JSON string.
    Date,
}

impl TypeTag {
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::String => "String",
            TypeTag::Number => "Number",
            TypeTag::Boolean => "Boolean",
            TypeTag::Object => "Object",
            TypeTag::Array => "Array",
            TypeTag::Date => "Date",
        }
    }

    pub fn matches(self, value: &Value) -> bool {
        match self {
            TypeTag::String => value.is_string(),
            TypeTag::Number => value.is_number(),
            TypeTag::Boolean => value.is_boolean(),
            TypeTag::Object => value.is_object(),
            TypeTag::Array => value.is_array(),
            TypeTag::Date => value
                .as_str()
                .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok()),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSpec {
    Scalar(TypeTag),
    /// An array whose elements must all carry the given tag. `None` skips the
    /// per-element check.
    ArrayOf(Option<TypeTag>),
}

impl TypeSpec {
    /// Name used in type-mismatch messages.
    pub fn name(self) -> &'static str {
        match self {
            TypeSpec::Scalar(tag) => tag.name(),
            TypeSpec::ArrayOf(_) => "Array",
        }
    }
}

/// Tag of a JSON value. `null` has none; strings always report `String`.
pub fn tag_of(value: &Value) -> Option<TypeTag> {
    match value {
        Value::Null => None,
        Value::Bool(_) => Some(TypeTag::Boolean),
        Value::Number(_) => Some(TypeTag::Number),
        Value::String(_) => Some(TypeTag::String),
        Value::Array(_) => Some(TypeTag::Array),
        Value::Object(_) => Some(TypeTag::Object),
    }
}

pub fn check_type(value: &Value, spec: TypeSpec) -> bool {
    match spec {
        TypeSpec::Scalar(tag) => tag.matches(value),
        TypeSpec::ArrayOf(element) => value.as_array().is_some_and(|items| match element {
            Some(tag) => items.iter().all(|v| tag.matches(v)),
            None => true,
        }),
    }
}

/// Presence test used by `required` fields and whole-object constraints:
/// `null`, `false`, `0`, and `""` count as absent.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}
