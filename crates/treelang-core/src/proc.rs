//! Proc descriptors and the program-wide proc table.
//!
//! Every proc (method, verb, implicit initializer, global proc) gets a
//! [`ProcId`] from the single [`ProcTable`], so ids are unique across the
//! whole program. Classes reference procs by id only.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::expr::{Expr, Location};
use crate::id::{ClassId, ProcId};
use crate::value_type::ComplexValueType;

/// Attribute flags on a proc declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcAttributes {
    /// Re-declaration of an inherited proc (`/mob/player/Move()` under a
    /// `/mob` that already declares `Move`).
    #[serde(default)]
    pub is_override: bool,
    /// Player-invocable.
    #[serde(default)]
    pub is_verb: bool,
    /// Verb hidden from verb panels.
    #[serde(default)]
    pub hidden: bool,
}

impl ProcAttributes {
    pub fn overriding() -> Self {
        ProcAttributes {
            is_override: true,
            ..Default::default()
        }
    }

    pub fn verb() -> Self {
        ProcAttributes {
            is_verb: true,
            ..Default::default()
        }
    }
}

/// One abstract step of a proc body.
///
/// Bytecode encoding is the code generator's job; the object tree only
/// records what the synthesized initializer must do, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcStep {
    /// Call the nearest ancestor's proc of the same kind (`..()`).
    CallSuper { arg_count: u32 },
    /// Marks the source location of the steps that follow.
    DebugSource(Location),
    /// Evaluate an expression for its effect and discard the result.
    Eval(Expr),
}

/// A proc declaration registered in the [`ProcTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcDef {
    pub id: ProcId,
    /// Declaring class. Global procs belong to the root.
    pub owner: ClassId,
    /// `None` for the synthesized initializer.
    pub name: Option<String>,
    pub attributes: ProcAttributes,
    /// Declared return-type constraint (`as mob`).
    pub return_type: Option<ComplexValueType>,
    pub body: Vec<ProcStep>,
}

impl ProcDef {
    pub fn is_override(&self) -> bool {
        self.attributes.is_override
    }

    pub fn push_step(&mut self, step: ProcStep) {
        self.body.push(step);
    }
}

/// Registry of every proc in the program, indexed by [`ProcId`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcTable {
    procs: Vec<ProcDef>,
    /// Free-standing global procs by name.
    global_procs: IndexMap<String, ProcId>,
}

impl ProcTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a proc and returns its new id.
    pub fn register(
        &mut self,
        owner: ClassId,
        name: Option<String>,
        attributes: ProcAttributes,
        return_type: Option<ComplexValueType>,
    ) -> ProcId {
        let id = ProcId(self.procs.len() as u32);
        self.procs.push(ProcDef {
            id,
            owner,
            name,
            attributes,
            return_type,
            body: Vec::new(),
        });
        id
    }

    /// Registers a free-standing global proc owned by the root.
    ///
    /// Returns [`CoreError::DuplicateGlobalProc`] if the name is taken.
    pub fn register_global(
        &mut self,
        name: &str,
        return_type: Option<ComplexValueType>,
    ) -> Result<ProcId, CoreError> {
        if self.global_procs.contains_key(name) {
            return Err(CoreError::DuplicateGlobalProc {
                name: name.to_string(),
            });
        }
        let id = self.register(
            ClassId::ROOT,
            Some(name.to_string()),
            ProcAttributes::default(),
            return_type,
        );
        self.global_procs.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn get(&self, id: ProcId) -> Option<&ProcDef> {
        self.procs.get(id.index())
    }

    pub fn get_mut(&mut self, id: ProcId) -> Option<&mut ProcDef> {
        self.procs.get_mut(id.index())
    }

    /// Like [`get`](Self::get) but returns [`CoreError::ProcNotFound`].
    pub fn try_get(&self, id: ProcId) -> Result<&ProcDef, CoreError> {
        self.get(id).ok_or(CoreError::ProcNotFound { id })
    }

    pub fn global_proc(&self, name: &str) -> Option<&ProcDef> {
        self.global_procs.get(name).and_then(|id| self.get(*id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcDef> {
        self.procs.iter()
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_type::ValueType;

    #[test]
    fn ids_are_sequential_and_unique() {
        let mut table = ProcTable::new();
        let a = table.register(ClassId(1), Some("New".into()), ProcAttributes::default(), None);
        let b = table.register(ClassId(2), Some("New".into()), ProcAttributes::overriding(), None);
        assert_eq!(a, ProcId(0));
        assert_eq!(b, ProcId(1));
        assert!(table.get(b).unwrap().is_override());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn global_procs_share_the_id_space() {
        let mut table = ProcTable::new();
        table.register(ClassId(1), Some("Move".into()), ProcAttributes::default(), None);
        let id = table
            .register_global("get_dist", Some(ValueType::NUM.into()))
            .unwrap();
        assert_eq!(id, ProcId(1));

        let def = table.global_proc("get_dist").unwrap();
        assert_eq!(def.owner, ClassId::ROOT);
        assert_eq!(def.return_type, Some(ValueType::NUM.into()));
    }

    #[test]
    fn duplicate_global_proc_errors() {
        let mut table = ProcTable::new();
        table.register_global("world_tick", None).unwrap();
        match table.register_global("world_tick", None) {
            Err(CoreError::DuplicateGlobalProc { name }) => assert_eq!(name, "world_tick"),
            other => panic!("expected DuplicateGlobalProc, got {other:?}"),
        }
    }

    #[test]
    fn try_get_unknown_id() {
        let table = ProcTable::new();
        assert_eq!(
            table.try_get(ProcId(3)).unwrap_err(),
            CoreError::ProcNotFound { id: ProcId(3) }
        );
    }
}
