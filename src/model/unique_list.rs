//! Ordered list that never holds two records with the same identity
//!
//! Uniqueness is decided by [`Record::is_same`], not full equality, so a
//! record's non-key fields can be edited through [`UniqueList::replace`]
//! while true duplicates are still rejected.

use std::cmp::Ordering;

use thiserror::Error;

use crate::domain::{EmployeeId, Record, RecordKind};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("This {kind} already exists: {identity}")]
    Duplicate { kind: RecordKind, identity: String },

    #[error("No {kind} found for {identity}")]
    NotFound { kind: RecordKind, identity: String },

    #[error("No employee with id {0} exists")]
    UnknownEmployee(EmployeeId),
}

impl StoreError {
    pub fn duplicate<T: Record>(record: &T) -> Self {
        StoreError::Duplicate {
            kind: T::KIND,
            identity: record.identity(),
        }
    }

    pub fn not_found<T: Record>(record: &T) -> Self {
        StoreError::NotFound {
            kind: T::KIND,
            identity: record.identity(),
        }
    }

    /// Returns true for identity collisions
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate { .. })
    }

    /// Returns true when the target record was absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

#[derive(Debug, Clone)]
pub struct UniqueList<T> {
    items: Vec<T>,
}

impl<T> Default for UniqueList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> UniqueList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a record with the same identity is present
    pub fn contains(&self, record: &T) -> bool {
        self.position(record).is_some()
    }

    /// Index of the first record with the same identity
    pub fn position(&self, record: &T) -> Option<usize> {
        self.items.iter().position(|r| r.is_same(record))
    }

    /// Appends a record whose identity is not yet present
    pub fn add(&mut self, record: T) -> Result<(), StoreError> {
        if self.contains(&record) {
            return Err(StoreError::duplicate(&record));
        }
        self.items.push(record);
        Ok(())
    }

    /// Removes the record with the same identity and returns it
    pub fn remove(&mut self, record: &T) -> Result<T, StoreError> {
        let index = self
            .position(record)
            .ok_or_else(|| StoreError::not_found(record))?;
        Ok(self.items.remove(index))
    }

    /// Replaces `target` with `edited` at the same position
    ///
    /// `edited` may keep `target`'s identity; it may not take the identity
    /// of any other record in the list. Returns the replaced record.
    pub fn replace(&mut self, target: &T, edited: T) -> Result<T, StoreError> {
        let index = self
            .position(target)
            .ok_or_else(|| StoreError::not_found(target))?;

        let collides = self
            .items
            .iter()
            .enumerate()
            .any(|(i, r)| i != index && r.is_same(&edited));
        if collides {
            return Err(StoreError::duplicate(&edited));
        }

        Ok(std::mem::replace(&mut self.items[index], edited))
    }

    /// Swaps in a whole new list, keeping the input order
    ///
    /// Leaves the current contents untouched when the input has duplicates.
    pub fn set_all(&mut self, records: Vec<T>) -> Result<(), StoreError> {
        Self::check_unique(&records)?;
        self.items = records;
        Ok(())
    }

    /// Verifies that no two records in `records` share an identity
    pub fn check_unique(records: &[T]) -> Result<(), StoreError> {
        for (i, record) in records.iter().enumerate() {
            if records[i + 1..].iter().any(|other| other.is_same(record)) {
                return Err(StoreError::duplicate(record));
            }
        }
        Ok(())
    }

    /// Stable in-place sort
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.items.sort_by(compare);
    }

    /// First record matching a predicate
    pub fn find<P>(&self, mut predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().find(|r| predicate(r))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a UniqueList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Employee, Sortable, EmployeeSortKey};
    use proptest::prelude::*;

    fn employee(id: &str, name: &str) -> Employee {
        Employee::new(
            id.parse().unwrap(),
            name.parse().unwrap(),
            "94351253".parse().unwrap(),
            "someone@example.com".parse().unwrap(),
            "Engineering".parse().unwrap(),
            "Engineer".parse().unwrap(),
            "4000".parse().unwrap(),
        )
    }

    #[test]
    fn add_rejects_same_identity() {
        let mut list = UniqueList::new();
        list.add(employee("000001", "Alex Yeoh")).unwrap();

        let err = list.add(employee("000001", "Someone Else")).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn add_contains_remove_roundtrip() {
        let mut list = UniqueList::new();
        let alex = employee("000001", "Alex Yeoh");

        assert!(!list.contains(&alex));
        list.add(alex.clone()).unwrap();
        assert!(list.contains(&alex));

        let removed = list.remove(&alex).unwrap();
        assert!(removed.is_identical(&alex));
        assert!(!list.contains(&alex));
    }

    #[test]
    fn remove_missing_is_not_found() {
        let mut list: UniqueList<Employee> = UniqueList::new();
        let err = list.remove(&employee("000001", "Alex Yeoh")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn replace_keeps_position_for_same_identity() {
        let mut list = UniqueList::new();
        list.add(employee("000001", "Alex Yeoh")).unwrap();
        list.add(employee("000002", "Bernice Yu")).unwrap();
        list.add(employee("000003", "Charlotte Oliveiro")).unwrap();

        let target = employee("000002", "Bernice Yu");
        let edited = employee("000002", "Bernice Yu Tan");
        let old = list.replace(&target, edited.clone()).unwrap();

        assert_eq!(old.name.as_str(), "Bernice Yu");
        assert!(list.as_slice()[1].is_identical(&edited));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn replace_rejects_collision_with_other_record() {
        let mut list = UniqueList::new();
        list.add(employee("000001", "Alex Yeoh")).unwrap();
        list.add(employee("000002", "Bernice Yu")).unwrap();

        let err = list
            .replace(&employee("000001", "Alex Yeoh"), employee("000002", "Alex Yeoh"))
            .unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(list.as_slice()[0].id.as_str(), "000001");
    }

    #[test]
    fn replace_missing_target_is_not_found() {
        let mut list = UniqueList::new();
        list.add(employee("000001", "Alex Yeoh")).unwrap();

        let err = list
            .replace(&employee("000009", "Nobody"), employee("000009", "Nobody"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn set_all_with_duplicates_keeps_previous_contents() {
        let mut list = UniqueList::new();
        list.add(employee("000005", "Kept Person")).unwrap();

        let err = list
            .set_all(vec![employee("000001", "Alex Yeoh"), employee("000001", "Alex Clone")])
            .unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(list.len(), 1);
        assert_eq!(list.as_slice()[0].id.as_str(), "000005");
    }

    #[test]
    fn set_all_adopts_input_order() {
        let mut list = UniqueList::new();
        list.add(employee("000005", "Old Person")).unwrap();

        list.set_all(vec![employee("000003", "Charlotte Oliveiro"), employee("000001", "Alex Yeoh")])
            .unwrap();

        let ids: Vec<_> = list.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["000003", "000001"]);
    }

    #[test]
    fn sort_by_reorders_in_place() {
        let mut list = UniqueList::new();
        list.add(employee("000010", "Ten")).unwrap();
        list.add(employee("000002", "Two")).unwrap();

        list.sort_by(|a, b| a.compare_by(b, EmployeeSortKey::Id));

        let ids: Vec<_> = list.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["000002", "000010"]);
    }

    proptest! {
        #[test]
        fn never_holds_two_records_with_one_identity(ids in proptest::collection::vec(0u32..20, 0..40)) {
            let mut list = UniqueList::new();
            for (n, id) in ids.iter().enumerate() {
                let record = employee(&format!("{:06}", id), &format!("Person {}", n));
                let already = list.contains(&record);
                let result = list.add(record);
                prop_assert_eq!(result.is_err(), already);
            }
            prop_assert!(UniqueList::check_unique(list.as_slice()).is_ok());
        }
    }
}
