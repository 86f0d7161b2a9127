//! Core error types for treelang-core.
//!
//! Two families, both built on `thiserror`:
//! - [`CoreError`]: structural misuse of the object tree (unknown ids,
//!   malformed paths, forbidden mutations). Returned immediately.
//! - [`BuildError`]: problems found while emitting artifacts. These are
//!   collected across the whole tree so a single pass reports all of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expr::Location;
use crate::id::{ClassId, GlobalId, ProcId};
use crate::path::TypePath;

/// Structural errors produced while building or querying the object tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A path string failed validation.
    #[error("invalid type path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// A class id does not exist in the tree.
    #[error("class not found: ClassId({id})", id = id.0)]
    ClassNotFound { id: ClassId },

    /// No class is registered under the given path.
    #[error("no class with path {path}")]
    PathNotFound { path: TypePath },

    /// A proc id does not exist in the proc table.
    #[error("proc not found: ProcId({id})", id = id.0)]
    ProcNotFound { id: ProcId },

    /// A global slot id does not exist in the global table.
    #[error("global not found: GlobalId({id})", id = id.0)]
    GlobalNotFound { id: GlobalId },

    /// A class already exists with a different parent than the one requested.
    #[error("cannot reparent {path}: already a child of {existing}")]
    Reparent { path: TypePath, existing: TypePath },

    /// The requested parent is the class itself or one of its descendants.
    #[error("{parent} cannot be the parent of {path}: inheritance cycle")]
    InheritanceCycle { path: TypePath, parent: TypePath },

    /// A name was declared both as an own variable and as an override on
    /// the same class.
    #[error("{path}: variable '{name}' is already declared as {existing}")]
    VariableConflict {
        path: TypePath,
        name: String,
        existing: &'static str,
    },

    /// A global proc with the same name was already registered.
    #[error("duplicate global proc '{name}'")]
    DuplicateGlobalProc { name: String },
}

/// A build-time error found while emitting the runtime artifact.
///
/// Every variant carries enough context to locate the offending declaration.
/// Any build error prevents a loadable artifact from being produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum BuildError {
    /// A variable's initial value cannot be reduced to a literal.
    #[error("{location}: failed to serialize {path}.{name}: value is not a compile-time literal")]
    UnrepresentableValue {
        path: TypePath,
        name: String,
        location: Location,
    },

    /// A global slot's initial value cannot be reduced to a literal.
    #[error("{location}: failed to serialize global '{name}': value is not a compile-time literal")]
    UnrepresentableGlobal {
        name: String,
        id: GlobalId,
        location: Location,
    },

    /// A declared variable type names a class that does not exist.
    #[error("{location}: {path}.{name} has unknown type {type_path}")]
    UnknownTypePath {
        path: TypePath,
        name: String,
        type_path: TypePath,
        location: Location,
    },
}
