//! Raw script parameters in, typed values out.
use std::fmt;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Untyped parameter as handed over by the script layer: a string or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct RawParam(Option<String>);

impl RawParam {
    pub fn null() -> Self { Self(None) }
    pub fn text(s: impl Into<String>) -> Self { Self(Some(s.into())) }
    pub fn as_str(&self) -> Option<&str> { self.0.as_deref() }
    pub fn is_null(&self) -> bool { self.0.is_none() }
}

impl fmt::Display for RawParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(s) => write!(f, "{s:?}"),
            None => f.write_str("null"),
        }
    }
}

impl From<&str> for RawParam {
    fn from(s: &str) -> Self { Self::text(s) }
}

impl From<String> for RawParam {
    fn from(s: String) -> Self { Self(Some(s)) }
}

impl<T: Into<String>> From<Option<T>> for RawParam {
    fn from(s: Option<T>) -> Self { Self(s.map(Into::into)) }
}

/// Script parameters are scalars; nested JSON has no raw-string form.
impl TryFrom<serde_json::Value> for RawParam {
    type Error = String;
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value as J;
        match value {
            J::Null => Ok(Self(None)),
            J::String(s) => Ok(Self(Some(s))),
            J::Number(n) => Ok(Self(Some(n.to_string()))),
            J::Bool(b) => Ok(Self(Some(b.to_string()))),
            J::Array(_) => Err("expected a scalar parameter, found an array".to_string()),
            J::Object(_) => Err("expected a scalar parameter, found an object".to_string()),
        }
    }
}

/// Parameter after coercion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
}

impl Value {
    pub fn float(f: f64) -> Self { Value::Float(OrderedFloat(f)) }
    pub fn str(s: impl Into<String>) -> Self { Value::Str(s.into()) }
    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self { Value::Int(i) => Some(*i), _ => None }
    }

    /// Ints widen to float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(f.0),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self { Value::Bool(b) => Some(*b), _ => None }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self { Value::Str(s) => Some(s), _ => None }
    }
}

/// Plain JSON scalars. JSON has no `inf`/`nan`, so non-finite floats are
/// written as the strings `"inf"`, `"-inf"` and `"nan"` instead of `null`.
impl Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) if x.0.is_nan() => serializer.serialize_str("nan"),
            Value::Float(x) if x.0.is_infinite() => {
                serializer.serialize_str(if x.0 > 0.0 { "inf" } else { "-inf" })
            }
            Value::Float(x) => serializer.serialize_f64(x.0),
            Value::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{}", x.0),
            Value::Str(s) => write!(f, "{s:?}"),
        }
    }
}
