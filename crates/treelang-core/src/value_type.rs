//! Declared value-type constraints.
//!
//! The language is dynamically typed; type annotations on vars and proc
//! return values (`as num|text`, `as /obj/item`) are advisory constraints the
//! compiler propagates for diagnostics. [`ValueType`] is the flag set,
//! [`ComplexValueType`] adds an optional class path.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::path::TypePath;

/// A set of primitive value categories.
///
/// `ANYTHING` is the unconstrained set and is represented as all bits set so
/// that `contains` holds for every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueType(u32);

impl ValueType {
    pub const NULL: ValueType = ValueType(1 << 0);
    pub const TEXT: ValueType = ValueType(1 << 1);
    pub const NUM: ValueType = ValueType(1 << 2);
    pub const PATH: ValueType = ValueType(1 << 3);
    pub const LIST: ValueType = ValueType(1 << 4);
    pub const RESOURCE: ValueType = ValueType(1 << 5);
    pub const OBJ: ValueType = ValueType(1 << 6);
    pub const MOB: ValueType = ValueType(1 << 7);
    pub const TURF: ValueType = ValueType(1 << 8);
    pub const AREA: ValueType = ValueType(1 << 9);
    pub const ANYTHING: ValueType = ValueType(u32::MAX);

    const NAMES: [(ValueType, &'static str); 10] = [
        (ValueType::NULL, "null"),
        (ValueType::TEXT, "text"),
        (ValueType::NUM, "num"),
        (ValueType::PATH, "path"),
        (ValueType::LIST, "list"),
        (ValueType::RESOURCE, "resource"),
        (ValueType::OBJ, "obj"),
        (ValueType::MOB, "mob"),
        (ValueType::TURF, "turf"),
        (ValueType::AREA, "area"),
    ];

    pub fn is_anything(self) -> bool {
        self == ValueType::ANYTHING
    }

    pub fn contains(self, other: ValueType) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for ValueType {
    fn default() -> Self {
        ValueType::ANYTHING
    }
}

impl BitOr for ValueType {
    type Output = ValueType;

    fn bitor(self, rhs: ValueType) -> ValueType {
        ValueType(self.0 | rhs.0)
    }
}

impl BitOrAssign for ValueType {
    fn bitor_assign(&mut self, rhs: ValueType) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anything() {
            return f.write_str("anything");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join("|"))
        }
    }
}

/// A value-type constraint optionally narrowed to a specific class path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComplexValueType {
    pub flags: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_path: Option<TypePath>,
}

impl ComplexValueType {
    pub fn anything() -> Self {
        ComplexValueType {
            flags: ValueType::ANYTHING,
            type_path: None,
        }
    }

    /// Constrains to instances of `path` (and its subtypes).
    pub fn of_path(flags: ValueType, path: TypePath) -> Self {
        ComplexValueType {
            flags,
            type_path: Some(path),
        }
    }

    pub fn is_anything(&self) -> bool {
        self.flags.is_anything() && self.type_path.is_none()
    }
}

impl Default for ComplexValueType {
    fn default() -> Self {
        Self::anything()
    }
}

impl From<ValueType> for ComplexValueType {
    fn from(flags: ValueType) -> Self {
        ComplexValueType {
            flags,
            type_path: None,
        }
    }
}

impl fmt::Display for ComplexValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_path {
            Some(path) => write!(f, "{} ({path})", self.flags),
            None => write!(f, "{}", self.flags),
        }
    }
}
