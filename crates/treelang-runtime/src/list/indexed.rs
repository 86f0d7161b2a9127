use indexmap::IndexMap;

use super::{ListContainer, ListRange, NULL};
use crate::error::ListError;
use crate::value::Value;

/// Ordered, 1-based list (`list(1, 2, 3)`).
///
/// Non-numeric elements may also carry an associated value
/// (`list("a" = 1)`); numeric keys always address positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedList {
    values: Vec<Value>,
    associations: IndexMap<Value, Value>,
}

impl IndexedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        IndexedList {
            values,
            associations: IndexMap::new(),
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    fn position(&self, key: &Value) -> Result<usize, ListError> {
        let len = self.values.len();
        match key.as_position() {
            Some(pos) if pos <= len => Ok(pos - 1),
            Some(pos) => Err(ListError::IndexOutOfRange {
                index: pos as i64,
                len,
            }),
            None => Err(ListError::InvalidKey { key: key.clone() }),
        }
    }

    /// Drops the association of `key` once no element refers to it.
    fn release(&mut self, key: &Value) {
        if !self.values.contains(key) {
            self.associations.shift_remove(key);
        }
    }
}

impl FromIterator<Value> for IndexedList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        IndexedList::from_values(iter.into_iter().collect())
    }
}

impl ListContainer for IndexedList {
    fn is_associative(&self) -> bool {
        !self.associations.is_empty()
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn set_value(&mut self, key: Value, value: Value, allow_growth: bool) -> Result<(), ListError> {
        match key {
            Value::Num(_) => {
                let len = self.values.len();
                if allow_growth && key.as_position() == Some(len + 1) {
                    self.values.push(value);
                    return Ok(());
                }
                let index = self.position(&key)?;
                let old = std::mem::replace(&mut self.values[index], value);
                self.release(&old);
                Ok(())
            }
            Value::Null => Err(ListError::InvalidKey { key }),
            key => {
                if !self.values.contains(&key) {
                    self.values.push(key.clone());
                }
                self.associations.insert(key, value);
                Ok(())
            }
        }
    }

    fn add_value(&mut self, value: Value) {
        self.values.push(value);
    }

    fn remove_value(&mut self, value: &Value) -> bool {
        let Some(index) = self.values.iter().position(|v| v == value) else {
            return false;
        };
        let removed = self.values.remove(index);
        self.release(&removed);
        true
    }

    fn get_value(&self, key: &Value) -> Result<&Value, ListError> {
        if let Value::Num(_) = key {
            let index = self.position(key)?;
            return Ok(&self.values[index]);
        }
        if let Some(value) = self.associations.get(key) {
            return Ok(value);
        }
        if self.values.contains(key) {
            return Ok(&NULL);
        }
        Err(ListError::KeyNotFound { key: key.clone() })
    }

    fn has_associated_value(&self, key: &Value) -> bool {
        self.associations.contains_key(key)
    }

    fn enumerate_values(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        Box::new(self.values.iter())
    }

    fn enumerate_assoc_values(&self) -> Box<dyn Iterator<Item = (&Value, &Value)> + '_> {
        Box::new(
            self.values
                .iter()
                .map(|key| (key, self.associations.get(key).unwrap_or(&NULL))),
        )
    }

    fn cut(&mut self, range: ListRange) -> Result<(), ListError> {
        let span = range.resolve(self.values.len())?;
        self.values.drain(span);
        let values = &self.values;
        self.associations.retain(|key, _| values.contains(key));
        Ok(())
    }

    fn create_copy(&self, range: ListRange) -> Result<Box<dyn ListContainer>, ListError> {
        let span = range.resolve(self.values.len())?;
        let values = self.values[span].to_vec();
        let associations = self
            .associations
            .iter()
            .filter(|(key, _)| values.contains(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(Box::new(IndexedList {
            values,
            associations,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(values: &[i32]) -> IndexedList {
        values.iter().map(|&n| Value::from(n)).collect()
    }

    #[test]
    fn numeric_keys_are_one_based_positions() {
        let mut list = nums(&[10, 20, 30]);
        assert_eq!(list.get_value(&Value::from(1)).unwrap(), &Value::from(10));
        list.set_value(Value::from(3), Value::from(99), false).unwrap();
        assert_eq!(list.values(), &[Value::from(10), Value::from(20), Value::from(99)]);
    }

    #[test]
    fn growth_by_one_only_when_allowed() {
        let mut list = nums(&[1]);
        assert_eq!(
            list.set_value(Value::from(2), Value::from(2), false),
            Err(ListError::IndexOutOfRange { index: 2, len: 1 })
        );
        list.set_value(Value::from(2), Value::from(2), true).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.set_value(Value::from(4), Value::from(4), true).is_err());
    }

    #[test]
    fn fractional_and_zero_indices_are_invalid_keys() {
        let list = nums(&[1, 2]);
        assert!(matches!(list.get_value(&Value::Num(1.5)), Err(ListError::InvalidKey { .. })));
        assert!(matches!(list.get_value(&Value::Num(0.0)), Err(ListError::InvalidKey { .. })));
    }

    #[test]
    fn text_keys_append_and_associate() {
        let mut list = IndexedList::new();
        list.set_value(Value::text("a"), Value::from(1), false).unwrap();
        list.set_value(Value::text("a"), Value::from(2), false).unwrap();
        list.add_value(Value::text("b"));

        assert!(list.is_associative());
        assert_eq!(list.len(), 2);
        assert_eq!(list.get_value(&Value::text("a")).unwrap(), &Value::from(2));
        assert_eq!(list.get_value(&Value::text("b")).unwrap(), &Value::Null);
        assert!(matches!(
            list.get_value(&Value::text("c")),
            Err(ListError::KeyNotFound { .. })
        ));
        assert_eq!(
            list.copy_assoc_values(),
            vec![(Value::text("a"), Value::from(2)), (Value::text("b"), Value::Null)]
        );
    }

    #[test]
    fn removing_last_occurrence_drops_association() {
        let mut list = IndexedList::new();
        list.set_value(Value::text("a"), Value::from(1), false).unwrap();
        list.add_value(Value::text("a"));

        assert!(list.remove_value(&Value::text("a")));
        assert!(list.has_associated_value(&Value::text("a")));
        assert!(list.remove_value(&Value::text("a")));
        assert!(!list.has_associated_value(&Value::text("a")));
        assert!(!list.remove_value(&Value::text("a")));
    }

    #[test]
    fn cut_removes_half_open_range() {
        let mut list = nums(&[1, 2, 3, 4, 5]);
        list.cut(ListRange::new(2, 4)).unwrap();
        assert_eq!(list.values(), &[Value::from(1), Value::from(4), Value::from(5)]);
        list.cut(ListRange::ALL).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn copy_keeps_associations_in_range() {
        let mut list = IndexedList::new();
        list.set_value(Value::text("a"), Value::from(1), false).unwrap();
        list.set_value(Value::text("b"), Value::from(2), false).unwrap();

        let copy = list.create_copy(ListRange::new(2, 0)).unwrap();
        assert_eq!(copy.len(), 1);
        assert_eq!(copy.get_value(&Value::text("b")).unwrap(), &Value::from(2));
        assert!(!copy.has_associated_value(&Value::text("a")));
    }

    #[test]
    fn find_value_honours_range() {
        let list = nums(&[7, 8, 7, 9]);
        assert_eq!(list.find_value(&Value::from(7), ListRange::ALL).unwrap(), 1);
        assert_eq!(list.find_value(&Value::from(7), ListRange::new(2, 0)).unwrap(), 3);
        assert_eq!(list.find_value(&Value::from(9), ListRange::new(1, 4)).unwrap(), 0);
        assert_eq!(list.find_value(&Value::from(5), ListRange::ALL).unwrap(), 0);
    }
}
