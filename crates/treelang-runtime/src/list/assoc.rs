use indexmap::IndexMap;

use super::{ListContainer, ListRange};
use crate::error::ListError;
use crate::value::Value;

/// Insertion-ordered key → value list. Iteration yields the keys.
///
/// Keys are not positions, so range operations only accept the default
/// (whole list) range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssocList {
    entries: IndexMap<Value, Value>,
}

impl AssocList {
    pub fn new() -> Self {
        Self::default()
    }

    fn whole_list_only(range: ListRange, op: &str) -> Result<(), ListError> {
        if range.is_default() {
            Ok(())
        } else {
            Err(ListError::invalid_operation(format!(
                "{op} with a range on an associative list"
            )))
        }
    }
}

impl FromIterator<(Value, Value)> for AssocList {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        AssocList {
            entries: iter.into_iter().collect(),
        }
    }
}

impl ListContainer for AssocList {
    fn is_associative(&self) -> bool {
        true
    }

    fn is_indexable_by_number(&self) -> bool {
        false
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn set_value(&mut self, key: Value, value: Value, _allow_growth: bool) -> Result<(), ListError> {
        self.entries.insert(key, value);
        Ok(())
    }

    fn add_value(&mut self, value: Value) {
        self.entries.entry(value).or_insert(Value::Null);
    }

    fn remove_value(&mut self, value: &Value) -> bool {
        self.entries.shift_remove(value).is_some()
    }

    fn get_value(&self, key: &Value) -> Result<&Value, ListError> {
        self.entries
            .get(key)
            .ok_or_else(|| ListError::KeyNotFound { key: key.clone() })
    }

    fn has_associated_value(&self, key: &Value) -> bool {
        self.entries.contains_key(key)
    }

    fn enumerate_values(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        Box::new(self.entries.keys())
    }

    fn enumerate_assoc_values(&self) -> Box<dyn Iterator<Item = (&Value, &Value)> + '_> {
        Box::new(self.entries.iter())
    }

    fn cut(&mut self, range: ListRange) -> Result<(), ListError> {
        Self::whole_list_only(range, "cut")?;
        self.entries.clear();
        Ok(())
    }

    fn create_copy(&self, range: ListRange) -> Result<Box<dyn ListContainer>, ListError> {
        Self::whole_list_only(range, "copy")?;
        Ok(Box::new(self.clone()))
    }

    fn contains_value(&self, value: &Value) -> bool {
        self.entries.contains_key(value)
    }
}
