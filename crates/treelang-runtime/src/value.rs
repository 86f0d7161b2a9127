//! Runtime values as seen by list containers.
//!
//! Lists hash and compare their elements, so [`Value`] has total equality:
//! `-0.0 == 0.0`, every NaN equals every other NaN, and values of different
//! variants are never equal.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use treelang_core::TypePath;

/// Reference to a live object instance. Owned by the interpreter's object
/// table; lists only hold the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRef(pub u32);

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0x{:x}]", self.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    #[default]
    Null,
    Num(f64),
    Text(String),
    Resource(String),
    Path(TypePath),
    Object(ObjectRef),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The number as a 1-based list position, if it is a positive integer.
    pub fn as_position(&self) -> Option<usize> {
        match *self {
            Value::Num(n) if n >= 1.0 && n.fract() == 0.0 && n <= usize::MAX as f64 => {
                Some(n as usize)
            }
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Num(_) => "num",
            Value::Text(_) => "text",
            Value::Resource(_) => "resource",
            Value::Path(_) => "path",
            Value::Object(_) => "object",
        }
    }

    /// Converts a compile-time literal from an emitted artifact back into a
    /// runtime value. List literals and unknown shapes yield `None`; the
    /// loader builds those as list objects instead.
    pub fn from_literal(literal: &serde_json::Value) -> Option<Value> {
        match literal {
            serde_json::Value::Null => Some(Value::Null),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Num),
            serde_json::Value::String(s) => Some(Value::Text(s.clone())),
            serde_json::Value::Object(map) => match map.get("type")?.as_str()? {
                "path" => {
                    let raw = map.get("value")?.as_str()?;
                    TypePath::parse(raw).ok().map(Value::Path)
                }
                "resource" => {
                    let raw = map.get("resourcePath")?.as_str()?;
                    Some(Value::Resource(raw.to_string()))
                }
                _ => None,
            },
            serde_json::Value::Bool(_) | serde_json::Value::Array(_) => None,
        }
    }
}

/// Bit pattern used for both equality and hashing of numbers.
fn canonical_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0
    } else {
        n.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Num(a), Value::Num(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Resource(a), Value::Resource(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Num(n) => canonical_bits(*n).hash(state),
            Value::Text(s) | Value::Resource(s) => s.hash(state),
            Value::Path(p) => p.hash(state),
            Value::Object(o) => o.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Num(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "\"{s}\""),
            Value::Resource(s) => write!(f, "'{s}'"),
            Value::Path(p) => write!(f, "{p}"),
            Value::Object(o) => write!(f, "{o}"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Num(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<TypePath> for Value {
    fn from(path: TypePath) -> Self {
        Value::Path(path)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}
