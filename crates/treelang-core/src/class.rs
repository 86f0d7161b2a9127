//! Class nodes: the per-class declarations stored in the object tree.
//!
//! A [`ClassNode`] only knows what was declared directly on it. Anything
//! that needs the inheritance chain (lookups, return types, subtype checks)
//! lives on [`ObjectTree`](crate::tree::ObjectTree), which owns the arena
//! the parent links point into.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::expr::InitExpr;
use crate::id::{ClassId, GlobalId, ProcId};
use crate::path::TypePath;
use crate::variable::Variable;

/// Proc ids declared under one name on one class, in declaration order.
///
/// Almost always a single id; verb groups and repeated declarations add more.
pub type ProcIds = SmallVec<[ProcId; 1]>;

/// Compile-time description of one class definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassNode {
    pub id: ClassId,
    pub path: TypePath,
    /// `None` only for the root.
    pub parent: Option<ClassId>,
    pub(crate) variables: IndexMap<String, Variable>,
    pub(crate) variable_overrides: IndexMap<String, Variable>,
    pub(crate) procs: IndexMap<String, ProcIds>,
    pub(crate) global_variables: IndexMap<String, GlobalId>,
    pub(crate) const_variables: IndexSet<String>,
    pub(crate) tmp_variables: IndexSet<String>,
    /// Var and verb initializations run before the user's `New()`.
    pub(crate) init_exprs: Vec<InitExpr>,
    pub(crate) init_proc: Option<ProcId>,
    pub(crate) verbs: Vec<ProcId>,
}

impl ClassNode {
    pub(crate) fn new(id: ClassId, path: TypePath, parent: Option<ClassId>) -> Self {
        ClassNode {
            id,
            path,
            parent,
            variables: IndexMap::new(),
            variable_overrides: IndexMap::new(),
            procs: IndexMap::new(),
            global_variables: IndexMap::new(),
            const_variables: IndexSet::new(),
            tmp_variables: IndexSet::new(),
            init_exprs: Vec::new(),
            init_proc: None,
            verbs: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn own_variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn variable_override(&self, name: &str) -> Option<&Variable> {
        self.variable_overrides.get(name)
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    pub fn variable_overrides(&self) -> impl Iterator<Item = &Variable> {
        self.variable_overrides.values()
    }

    pub fn own_global(&self, name: &str) -> Option<GlobalId> {
        self.global_variables.get(name).copied()
    }

    pub fn global_variables(&self) -> &IndexMap<String, GlobalId> {
        &self.global_variables
    }

    /// Procs declared directly on this class under `name`.
    pub fn own_procs(&self, name: &str) -> Option<&[ProcId]> {
        self.procs.get(name).map(|ids| ids.as_slice())
    }

    pub fn procs(&self) -> &IndexMap<String, ProcIds> {
        &self.procs
    }

    pub fn is_const(&self, name: &str) -> bool {
        self.const_variables.contains(name)
    }

    pub fn is_tmp(&self, name: &str) -> bool {
        self.tmp_variables.contains(name)
    }

    pub fn init_exprs(&self) -> &[InitExpr] {
        &self.init_exprs
    }

    pub fn init_proc(&self) -> Option<ProcId> {
        self.init_proc
    }

    pub fn verbs(&self) -> &[ProcId] {
        &self.verbs
    }

    pub(crate) fn add_proc(&mut self, name: &str, id: ProcId) {
        self.procs.entry(name.to_string()).or_default().push(id);
    }
}
