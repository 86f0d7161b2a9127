//! Runtime containers for treelang.
//!
//! Holds the value model list containers operate on and the list contract
//! itself with its two variants: the 1-based [`IndexedList`] and the
//! insertion-ordered [`AssocList`].

pub mod error;
pub mod list;
pub mod value;

pub use error::ListError;
pub use list::{AssocList, IndexedList, ListContainer, ListRange};
pub use value::{ObjectRef, Value};
