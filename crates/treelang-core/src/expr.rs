//! Declaration-level expressions and source locations.
//!
//! The parser is an external collaborator; the object tree only needs enough
//! of an expression to (a) decide whether it reduces to a literal the runtime
//! loader can read, and (b) hand it back to the code generator in
//! declaration order. [`Expr`] covers exactly that.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::path::TypePath;

/// Position of a declaration in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Location {
            file: file.into(),
            line,
            column,
        }
    }

    /// Location for declarations synthesized by the compiler itself.
    pub fn internal() -> Self {
        Location::new("<internal>", 0, 0)
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::internal()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// An expression as it appears in a var default or implicit initializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Null,
    Num(f64),
    Text(String),
    /// A resource file reference (`'icons/mob.dmi'`).
    Resource(String),
    /// A type path literal (`/obj/item`).
    Path(TypePath),
    /// `list(a, b, c)`. Literal only when every element is.
    List(Vec<Expr>),
    /// Read of a global variable.
    Global(String),
    /// Call of a proc by name.
    Call { name: String, args: Vec<Expr> },
    /// `new /path(args)`.
    New { path: TypePath, args: Vec<Expr> },
    /// `src.name = value`, emitted by the implicit initializer.
    AssignField { name: String, value: Box<Expr> },
}

/// Largest integer magnitude an f64 represents exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

impl Expr {
    pub fn num(value: f64) -> Self {
        Expr::Num(value)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Expr::Text(value.into())
    }

    pub fn assign_field(name: impl Into<String>, value: Expr) -> Self {
        Expr::AssignField {
            name: name.into(),
            value: Box::new(value),
        }
    }

    /// Reduces the expression to the JSON literal form read by the runtime
    /// loader, or `None` if it can only be evaluated at runtime.
    ///
    /// Non-finite numbers have no JSON representation and are rejected.
    pub fn try_as_literal(&self) -> Option<serde_json::Value> {
        match self {
            Expr::Null => Some(serde_json::Value::Null),
            Expr::Num(n) if !n.is_finite() => None,
            Expr::Num(n) if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT => Some(json!(*n as i64)),
            Expr::Num(n) => serde_json::Number::from_f64(*n).map(serde_json::Value::Number),
            Expr::Text(s) => Some(json!(s)),
            Expr::Resource(s) => Some(json!({ "type": "resource", "resourcePath": s })),
            Expr::Path(p) => Some(json!({ "type": "path", "value": p.as_str() })),
            Expr::List(items) => {
                let values = items
                    .iter()
                    .map(Expr::try_as_literal)
                    .collect::<Option<Vec<_>>>()?;
                Some(json!({ "type": "list", "values": values }))
            }
            Expr::Global(_) | Expr::Call { .. } | Expr::New { .. } | Expr::AssignField { .. } => {
                None
            }
        }
    }

    pub fn is_literal(&self) -> bool {
        self.try_as_literal().is_some()
    }
}

/// A pending implicit-initializer expression together with its location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitExpr {
    #[serde(default)]
    pub location: Location,
    pub expr: Expr,
}

impl InitExpr {
    pub fn new(location: Location, expr: Expr) -> Self {
        InitExpr { location, expr }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_literals() {
        assert_eq!(Expr::Null.try_as_literal(), Some(serde_json::Value::Null));
        assert_eq!(Expr::num(5.0).try_as_literal(), Some(json!(5)));
        assert_eq!(Expr::num(0.25).try_as_literal(), Some(json!(0.25)));
        assert_eq!(Expr::text("hi").try_as_literal(), Some(json!("hi")));
    }

    #[test]
    fn non_finite_numbers_are_not_literals() {
        assert!(!Expr::num(f64::NAN).is_literal());
        assert!(!Expr::num(f64::INFINITY).is_literal());
    }

    #[test]
    fn tagged_literals() {
        assert_eq!(
            Expr::Path(TypePath::obj()).try_as_literal(),
            Some(json!({ "type": "path", "value": "/obj" }))
        );
        assert_eq!(
            Expr::Resource("icons/mob.dmi".into()).try_as_literal(),
            Some(json!({ "type": "resource", "resourcePath": "icons/mob.dmi" }))
        );
    }

    #[test]
    fn list_literal_requires_literal_elements() {
        let literal = Expr::List(vec![Expr::num(1.0), Expr::text("a")]);
        assert_eq!(
            literal.try_as_literal(),
            Some(json!({ "type": "list", "values": [1, "a"] }))
        );

        let runtime = Expr::List(vec![
            Expr::num(1.0),
            Expr::Call {
                name: "rand".into(),
                args: vec![],
            },
        ]);
        assert!(!runtime.is_literal());
    }

    #[test]
    fn runtime_expressions_are_not_literals() {
        assert!(!Expr::Global("tick".into()).is_literal());
        assert!(!Expr::New {
            path: TypePath::obj(),
            args: vec![]
        }
        .is_literal());
        assert!(!Expr::assign_field("hp", Expr::num(10.0)).is_literal());
    }

    #[test]
    fn deserialize_from_declaration_json() {
        let expr: Expr = serde_json::from_str(r#"{"call": {"name": "rand", "args": [{"num": 1}]}}"#).unwrap();
        assert_eq!(
            expr,
            Expr::Call {
                name: "rand".into(),
                args: vec![Expr::num(1.0)]
            }
        );
        let null: Expr = serde_json::from_str("\"null\"").unwrap();
        assert_eq!(null, Expr::Null);
    }

    #[test]
    fn location_display() {
        assert_eq!(Location::new("code/mob.dm", 12, 4).to_string(), "code/mob.dm:12:4");
    }
}
