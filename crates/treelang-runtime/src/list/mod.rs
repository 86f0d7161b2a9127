//! The list contract shared by every list variant.
//!
//! The interpreter's collection operators (`L[k] = v`, `L += v`, `L -= v`,
//! `v in L`, `for (var/x in L)`) dispatch through [`ListContainer`], so a
//! variant only has to provide the primitive operations. Positions are
//! 1-based everywhere.

pub mod assoc;
pub mod indexed;

use std::fmt;
use std::ops::Range;

use crate::error::ListError;
use crate::value::Value;

pub use assoc::AssocList;
pub use indexed::IndexedList;

/// Associated value reported for keys that have none.
pub(crate) static NULL: Value = Value::Null;

/// A 1-based, half-open `[start, end)` range over list positions.
///
/// `end == 0` means "through the end of the list". The default range
/// (`1, 0`) covers the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRange {
    pub start: i64,
    pub end: i64,
}

impl ListRange {
    pub const ALL: ListRange = ListRange { start: 1, end: 0 };

    pub fn new(start: i64, end: i64) -> Self {
        ListRange { start, end }
    }

    /// True unless either bound differs from its default.
    pub fn is_default(&self) -> bool {
        self.start == 1 && self.end == 0
    }

    /// Converts to a 0-based slice range for a list of `len` elements.
    pub fn resolve(&self, len: usize) -> Result<Range<usize>, ListError> {
        let past_end = len as i64 + 1;
        if self.start < 1 || self.start > past_end {
            return Err(ListError::IndexOutOfRange {
                index: self.start,
                len,
            });
        }
        let end = if self.end == 0 { past_end } else { self.end };
        if end < self.start || end > past_end {
            return Err(ListError::IndexOutOfRange {
                index: self.end,
                len,
            });
        }
        Ok((self.start - 1) as usize..(end - 1) as usize)
    }
}

impl Default for ListRange {
    fn default() -> Self {
        ListRange::ALL
    }
}

/// Operations every list variant supports.
pub trait ListContainer: fmt::Debug {
    /// Whether elements can carry associated values (`L[key] = value`).
    fn is_associative(&self) -> bool;

    fn is_indexable_by_number(&self) -> bool {
        true
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `L[key] = value`. Numeric keys address positions on variants that are
    /// indexable by number; `allow_growth` permits writing one past the end.
    fn set_value(&mut self, key: Value, value: Value, allow_growth: bool) -> Result<(), ListError>;

    /// `L += value`.
    fn add_value(&mut self, value: Value);

    /// `L -= value`. Returns whether anything was removed.
    fn remove_value(&mut self, value: &Value) -> bool;

    /// `L[key]`.
    fn get_value(&self, key: &Value) -> Result<&Value, ListError>;

    fn has_associated_value(&self, key: &Value) -> bool;

    /// Elements (keys, for associative variants) in list order. Each call
    /// starts a fresh pass.
    fn enumerate_values(&self) -> Box<dyn Iterator<Item = &Value> + '_>;

    /// `(key, associated value)` pairs in list order; keys without an
    /// association pair with null.
    fn enumerate_assoc_values(&self) -> Box<dyn Iterator<Item = (&Value, &Value)> + '_>;

    /// Removes the elements in `range`.
    fn cut(&mut self, range: ListRange) -> Result<(), ListError>;

    /// A new, independent list holding the elements in `range`.
    fn create_copy(&self, range: ListRange) -> Result<Box<dyn ListContainer>, ListError>;

    /// 1-based position of the first `value` within `range`, or 0.
    fn find_value(&self, value: &Value, range: ListRange) -> Result<usize, ListError> {
        if !range.is_default() && !self.is_indexable_by_number() {
            return Err(ListError::invalid_operation(
                "find with a range on a list that is not indexable by number",
            ));
        }
        let span = range.resolve(self.len())?;
        let found = self
            .enumerate_values()
            .enumerate()
            .skip(span.start)
            .take(span.len())
            .find(|(_, element)| *element == value)
            .map(|(i, _)| i + 1);
        Ok(found.unwrap_or(0))
    }

    /// `value in L`.
    fn contains_value(&self, value: &Value) -> bool {
        self.enumerate_values().any(|element| element == value)
    }

    fn copy_to_array(&self) -> Vec<Value> {
        self.enumerate_values().cloned().collect()
    }

    fn copy_assoc_values(&self) -> Vec<(Value, Value)> {
        self.enumerate_assoc_values()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_covers_everything() {
        assert!(ListRange::default().is_default());
        assert_eq!(ListRange::ALL.resolve(4).unwrap(), 0..4);
        assert_eq!(ListRange::ALL.resolve(0).unwrap(), 0..0);
    }

    #[test]
    fn range_is_half_open_and_one_based() {
        assert_eq!(ListRange::new(2, 4).resolve(5).unwrap(), 1..3);
        assert_eq!(ListRange::new(3, 0).resolve(5).unwrap(), 2..5);
        assert_eq!(ListRange::new(6, 0).resolve(5).unwrap(), 5..5);
    }

    #[test]
    fn either_bound_off_default_is_non_default() {
        assert!(!ListRange::new(2, 0).is_default());
        assert!(!ListRange::new(1, 3).is_default());
    }

    #[test]
    fn out_of_range_bounds_are_rejected() {
        assert_eq!(
            ListRange::new(0, 0).resolve(3),
            Err(ListError::IndexOutOfRange { index: 0, len: 3 })
        );
        assert_eq!(
            ListRange::new(2, 9).resolve(3),
            Err(ListError::IndexOutOfRange { index: 9, len: 3 })
        );
        assert!(ListRange::new(3, 2).resolve(3).is_err());
    }
}
