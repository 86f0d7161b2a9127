//! Compile-time object tree for the treelang scripting language.
//!
//! The language is single-inheritance and path-addressed (`/obj/item`).
//! This crate holds the class hierarchy the compiler builds from source
//! declarations, the program-wide proc and global tables, the resolution
//! rules every later stage relies on, implicit initializer synthesis, and
//! the artifact format handed to the runtime loader.
//!
//! # Modules
//!
//! - [`tree`] -- [`ObjectTree`], class creation and declarations
//! - [`resolve`] -- nearest-ancestor lookups, return types, subtype checks
//! - [`init`] -- implicit initializer synthesis
//! - [`artifact`] -- compiled records for the runtime loader
//! - [`decl`] -- serialized declaration files

pub mod artifact;
pub mod class;
pub mod decl;
pub mod error;
pub mod expr;
pub mod global;
pub mod id;
pub mod init;
pub mod path;
pub mod proc;
pub mod resolve;
pub mod tree;
pub mod value_type;
pub mod variable;

// Re-export commonly used types
pub use artifact::{CompiledTree, EmitError, EmitOptions, TypeArtifact};
pub use class::ClassNode;
pub use decl::DeclarationFile;
pub use error::{BuildError, CoreError};
pub use expr::{Expr, InitExpr, Location};
pub use id::{ClassId, GlobalId, ProcId};
pub use path::TypePath;
pub use proc::{ProcAttributes, ProcDef, ProcStep};
pub use tree::ObjectTree;
pub use value_type::{ComplexValueType, ValueType};
pub use variable::Variable;
