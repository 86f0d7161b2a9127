//! Instance variable declarations.

use serde::{Deserialize, Serialize};

use crate::expr::{Expr, Location};
use crate::path::TypePath;
use crate::value_type::ComplexValueType;

/// A `var` declaration on a class, either new or overriding an ancestor's.
///
/// An override need not match the shape of what it overrides; it only
/// replaces the value the runtime sees under the same name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    /// Declared class type (`var/obj/item/held`).
    pub type_path: Option<TypePath>,
    pub is_const: bool,
    /// Initial value. `None` reads as null at runtime.
    pub value: Option<Expr>,
    pub value_type: ComplexValueType,
    pub location: Location,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable {
            name: name.into(),
            type_path: None,
            is_const: false,
            value: None,
            value_type: ComplexValueType::anything(),
            location: Location::internal(),
        }
    }

    pub fn with_value(mut self, value: Expr) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_type(mut self, type_path: TypePath) -> Self {
        self.type_path = Some(type_path);
        self
    }

    pub fn with_const(mut self, is_const: bool) -> Self {
        self.is_const = is_const;
        self
    }

    pub fn with_value_type(mut self, value_type: ComplexValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// The JSON literal the runtime loader reads for this variable, or
    /// `None` if the initial value needs runtime evaluation.
    pub fn try_as_json(&self) -> Option<serde_json::Value> {
        match &self.value {
            None => Some(serde_json::Value::Null),
            Some(expr) => expr.try_as_literal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_value_serializes_as_null() {
        assert_eq!(Variable::new("x").try_as_json(), Some(serde_json::Value::Null));
    }

    #[test]
    fn builder_sets_fields() {
        let var = Variable::new("held")
            .with_type(TypePath::obj())
            .with_const(true)
            .with_value(Expr::Null)
            .at(Location::new("a.dm", 3, 1));
        assert_eq!(var.type_path, Some(TypePath::obj()));
        assert!(var.is_const);
        assert_eq!(var.location.line, 3);
    }

    #[test]
    fn runtime_value_has_no_json_form() {
        let var = Variable::new("spawned").with_value(Expr::New {
            path: TypePath::obj(),
            args: vec![],
        });
        assert!(var.try_as_json().is_none());
    }
}
