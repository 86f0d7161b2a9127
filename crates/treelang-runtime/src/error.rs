//! Runtime list errors.
//!
//! These surface to script code as runtime exceptions; none of them leave
//! the list in a partially modified state.

use thiserror::Error;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ListError {
    #[error("key {key} not found in list")]
    KeyNotFound { key: Value },

    #[error("invalid list operation: {reason}")]
    InvalidOperation { reason: String },

    #[error("list index {index} out of range (length {len})")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("{key} cannot be used as a list key")]
    InvalidKey { key: Value },
}

impl ListError {
    pub(crate) fn invalid_operation(reason: impl Into<String>) -> Self {
        ListError::InvalidOperation {
            reason: reason.into(),
        }
    }
}
