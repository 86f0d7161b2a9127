//! Stable ID newtypes for object tree entities.
//!
//! All IDs are distinct newtype wrappers over `u32`, providing type safety
//! so that a `ProcId` cannot be accidentally used where a `GlobalId` is expected.
//! Each ID doubles as the index into the program-wide table that owns the entity.

use std::fmt;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Class identity within the object tree. Maps to a petgraph `NodeIndex<u32>`.
///
/// The root class is always `ClassId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub u32);

/// Proc identity, unique across the whole program (methods, verbs,
/// initializers and global procs share one id space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcId(pub u32);

/// Global ("static") variable slot identity, unique across the whole program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalId(pub u32);

impl ClassId {
    pub const ROOT: ClassId = ClassId(0);

    /// Position in the owning arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl ProcId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl GlobalId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// Display implementations -- just print the inner value.

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Bridge between ClassId and petgraph's NodeIndex<u32>.

impl From<NodeIndex<u32>> for ClassId {
    fn from(idx: NodeIndex<u32>) -> Self {
        ClassId(idx.index() as u32)
    }
}

impl From<ClassId> for NodeIndex<u32> {
    fn from(id: ClassId) -> Self {
        NodeIndex::new(id.0 as usize)
    }
}
