/// Touched-field tracking
///
/// A field enters the tracker on any user edit, even one that writes back the
/// original value. Presence in the payload is a user-intent signal.
use std::collections::BTreeSet;

use super::data::Field;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeTracker {
    touched: BTreeSet<Field>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, field: Field) {
        self.touched.insert(field);
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    /// Touched fields in document order
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.touched.iter().copied()
    }

    pub fn clear(&mut self) {
        self.touched.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_is_idempotent() {
        let mut tracker = ChangeTracker::new();
        tracker.mark(Field::Tags);
        tracker.mark(Field::Author);
        tracker.mark(Field::Tags);

        let fields: Vec<_> = tracker.fields().collect();
        assert_eq!(fields, vec![Field::Author, Field::Tags]);
    }

    #[test]
    fn test_clear() {
        let mut tracker = ChangeTracker::new();
        tracker.mark(Field::Version);
        tracker.clear();
        assert!(tracker.is_empty());
        assert!(!tracker.is_touched(Field::Version));
    }
}
