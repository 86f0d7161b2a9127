//! Symbol resolution across the inheritance chain.
//!
//! Every lookup is a nearest-ancestor walk: start at the queried class and
//! move to the parent until something is found. Nothing is merged across
//! levels; the nearest declaration replaces everything above it.
//!
//! Globals are the one asymmetric case. Globals declared on the root are only
//! visible when the root itself is queried. A walk that starts below the root
//! stops before reaching it, so code in a subtree never silently binds to a
//! root-level global.
//!
//! All queries here are pure reads.

use crate::class::ClassNode;
use crate::global::GlobalSlot;
use crate::id::{ClassId, GlobalId, ProcId};
use crate::path::TypePath;
use crate::tree::ObjectTree;
use crate::value_type::{ComplexValueType, ValueType};
use crate::variable::Variable;

impl ObjectTree {
    /// Finds the nearest declaration of an instance variable, checking own
    /// variables then overrides at each level.
    ///
    /// Returns the declaring class's entry itself, not a copy. Globals are
    /// not consulted.
    pub fn find_var(&self, class: ClassId, name: &str) -> Option<&Variable> {
        self.lineage(class).find_map(|node| {
            node.own_variable(name)
                .or_else(|| node.variable_override(name))
        })
    }

    /// True if `class` or an ancestor introduces `name` as a new instance
    /// field. Overrides and globals do not count.
    ///
    /// Distinguishes "this declaration adds a field" from "this declaration
    /// overrides one".
    pub fn declares_instance_var(&self, class: ClassId, name: &str) -> bool {
        self.lineage(class)
            .any(|node| node.own_variable(name).is_some())
    }

    /// True if a proc named `name` is declared on `class` or an ancestor.
    pub fn has_proc(&self, class: ClassId, name: &str) -> bool {
        self.find_procs(class, name).is_some()
    }

    /// True only if `class` itself declares `name`.
    pub fn has_own_proc(&self, class: ClassId, name: &str) -> bool {
        self.class(class)
            .is_some_and(|node| node.own_procs(name).is_some())
    }

    /// The proc ids declared under `name` by the nearest class that declares
    /// it. Ancestors' ids are never appended.
    pub fn find_procs(&self, class: ClassId, name: &str) -> Option<&[ProcId]> {
        self.lineage(class).find_map(|node| node.own_procs(name))
    }

    /// True if the global `name` is visible from `class`.
    ///
    /// On the root this checks the root's own globals only. On any other
    /// class it walks the ancestors but stops before the root.
    pub fn has_global_var(&self, class: ClassId, name: &str) -> bool {
        self.global_var_id(class, name).is_some()
    }

    /// Resolves a global slot id with the same visibility rule as
    /// [`has_global_var`](Self::has_global_var).
    pub fn global_var_id(&self, class: ClassId, name: &str) -> Option<GlobalId> {
        self.global_scope(class)
            .find_map(|node| node.own_global(name))
    }

    /// Resolves a global slot with the same visibility rule as
    /// [`has_global_var`](Self::has_global_var).
    pub fn find_global_var(&self, class: ClassId, name: &str) -> Option<&GlobalSlot> {
        self.global_var_id(class, name)
            .and_then(|id| self.globals.get(id))
    }

    /// Classes whose globals are visible from `class`.
    fn global_scope(&self, class: ClassId) -> impl Iterator<Item = &ClassNode> {
        let from_root = class == ClassId::ROOT;
        self.lineage(class)
            .take_while(move |node| from_root || !node.is_root())
    }

    /// Resolves the return-type constraint of the proc `name` as seen from
    /// `class`.
    ///
    /// - On the root, a global proc with that name wins.
    /// - Otherwise the nearest declaration is used. If that proc is an
    ///   override its own annotation is ignored and the type comes from the
    ///   parent, or is unconstrained when no ancestor says anything.
    /// - A non-override proc reports its own annotation, which may be absent.
    ///
    /// Returns `None` when no proc is found or the resolved proc declares no
    /// return type.
    pub fn proc_return_type(&self, class: ClassId, name: &str) -> Option<ComplexValueType> {
        let node = self.class(class)?;
        if node.is_root() {
            if let Some(global) = self.procs.global_proc(name) {
                return global.return_type.clone();
            }
        }

        let Some(ids) = self.find_procs(class, name) else {
            return node
                .parent
                .and_then(|parent| self.proc_return_type(parent, name));
        };

        let proc = self.procs.get(*ids.first()?)?;
        if proc.is_override() {
            return Some(
                node.parent
                    .and_then(|parent| self.proc_return_type(parent, name))
                    .unwrap_or_else(ComplexValueType::anything),
            );
        }

        proc.return_type.clone()
    }

    /// Declared return type of the most recently declared proc under `name`,
    /// unconstrained when there is none. Override flags are not consulted.
    pub fn last_proc_return_type(&self, class: ClassId, name: &str) -> ComplexValueType {
        self.find_procs(class, name)
            .and_then(|ids| ids.last())
            .and_then(|id| self.procs.get(*id))
            .and_then(|proc| proc.return_type.clone())
            .unwrap_or_else(ComplexValueType::anything)
    }

    /// True if `class` is `path` or inherits from it.
    pub fn is_subtype_of(&self, class: ClassId, path: &TypePath) -> bool {
        self.lineage(class).any(|node| &node.path == path)
    }

    /// True if `class` is `ancestor` or inherits from it.
    pub fn is_subclass_of(&self, class: ClassId, ancestor: ClassId) -> bool {
        self.lineage(class).any(|node| node.id == ancestor)
    }

    /// Built-in category of a class: mob, then obj, then area, first match
    /// wins; anything else is unconstrained.
    pub fn value_kind(&self, class: ClassId) -> ValueType {
        if self.is_subtype_of(class, &TypePath::mob()) {
            ValueType::MOB
        } else if self.is_subtype_of(class, &TypePath::obj()) {
            ValueType::OBJ
        } else if self.is_subtype_of(class, &TypePath::area()) {
            ValueType::AREA
        } else {
            ValueType::ANYTHING
        }
    }
}
