//! Program-wide table of global ("static") variable slots.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::expr::{Expr, Location};
use crate::id::GlobalId;
use crate::path::TypePath;
use crate::value_type::ComplexValueType;

/// One shared storage slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSlot {
    pub id: GlobalId,
    pub name: String,
    pub type_path: Option<TypePath>,
    pub is_const: bool,
    pub value_type: ComplexValueType,
    pub value: Option<Expr>,
    pub location: Location,
}

/// Flat registry of global slots addressed by [`GlobalId`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalTable {
    slots: Vec<GlobalSlot>,
}

impl GlobalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new slot. Slots are never reused, even for equal names
    /// declared on different classes.
    pub fn create(
        &mut self,
        name: &str,
        type_path: Option<TypePath>,
        is_const: bool,
        value_type: ComplexValueType,
    ) -> GlobalId {
        let id = GlobalId(self.slots.len() as u32);
        self.slots.push(GlobalSlot {
            id,
            name: name.to_string(),
            type_path,
            is_const,
            value_type,
            value: None,
            location: Location::internal(),
        });
        id
    }

    pub fn get(&self, id: GlobalId) -> Option<&GlobalSlot> {
        self.slots.get(id.index())
    }

    pub fn get_mut(&mut self, id: GlobalId) -> Result<&mut GlobalSlot, CoreError> {
        self.slots
            .get_mut(id.index())
            .ok_or(CoreError::GlobalNotFound { id })
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlobalSlot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
