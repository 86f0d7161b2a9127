//! Serialized declaration files.
//!
//! The parser is not part of this crate. Tools and tests describe a program's
//! declarations as a [`DeclarationFile`] (usually JSON) and build the tree
//! with [`ObjectTree::from_declarations`], which replays them through the
//! same builder methods a parser would call.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::expr::{Expr, InitExpr, Location};
use crate::path::TypePath;
use crate::proc::ProcAttributes;
use crate::tree::ObjectTree;
use crate::value_type::ComplexValueType;
use crate::variable::Variable;

/// Every declaration in one compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclarationFile {
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    #[serde(default)]
    pub global_procs: Vec<ProcDecl>,
}

/// Declarations for one class path. A path may appear more than once; later
/// entries add to the same class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDecl {
    pub path: TypePath,
    #[serde(default)]
    pub parent: Option<TypePath>,
    #[serde(default)]
    pub vars: Vec<VarDecl>,
    #[serde(default)]
    pub overrides: Vec<VarDecl>,
    #[serde(default)]
    pub globals: Vec<VarDecl>,
    #[serde(default)]
    pub procs: Vec<ProcDecl>,
    /// Implicit initializer expressions, in order.
    #[serde(default)]
    pub init: Vec<InitExpr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_path: Option<TypePath>,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_tmp: bool,
    #[serde(default)]
    pub value: Option<Expr>,
    #[serde(default)]
    pub value_type: Option<ComplexValueType>,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcDecl {
    pub name: String,
    #[serde(flatten)]
    pub attributes: ProcAttributes,
    #[serde(default)]
    pub return_type: Option<ComplexValueType>,
}

impl VarDecl {
    fn to_variable(&self) -> Variable {
        Variable {
            name: self.name.clone(),
            type_path: self.type_path.clone(),
            is_const: self.is_const,
            value: self.value.clone(),
            value_type: self.value_type.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
        }
    }
}

impl ObjectTree {
    /// Builds a tree, starting from the built-in classes, from a set of
    /// declarations.
    ///
    /// Classes are created in file order. Initializers are not synthesized;
    /// call [`finalize`](ObjectTree::finalize) once all declarations are in.
    pub fn from_declarations(file: &DeclarationFile) -> Result<ObjectTree, CoreError> {
        let mut tree = ObjectTree::with_builtin_types();

        for proc in &file.global_procs {
            tree.add_global_proc(&proc.name, proc.return_type.clone())?;
        }

        for decl in &file.classes {
            let class = tree.create_class(&decl.path, decl.parent.as_ref())?;

            for var in &decl.vars {
                tree.declare_var(class, var.to_variable())?;
                tree.set_tmp(class, &var.name, var.is_tmp)?;
            }
            for var in &decl.overrides {
                tree.declare_override(class, var.to_variable())?;
                tree.set_tmp(class, &var.name, var.is_tmp)?;
            }
            for var in &decl.globals {
                let id = tree.create_global_var(
                    class,
                    &var.name,
                    var.type_path.clone(),
                    var.is_const,
                    var.value_type.clone().unwrap_or_default(),
                )?;
                if let Some(value) = &var.value {
                    let location = var.location.clone().unwrap_or_default();
                    tree.set_global_value(id, value.clone(), location)?;
                }
            }
            for proc in &decl.procs {
                tree.add_proc(class, &proc.name, proc.attributes, proc.return_type.clone())?;
            }
            for init in &decl.init {
                tree.push_init_expr(class, init.clone())?;
            }
        }

        tracing::debug!(
            classes = tree.class_count(),
            procs = tree.procs.len(),
            globals = tree.globals.len(),
            "loaded declarations"
        );
        Ok(tree)
    }
}
