//! Entity stores
//!
//! An [`EntityStore`] owns one [`UniqueList`] and announces every successful
//! mutation through its [`ChangeNotifier`]. Failed operations change nothing
//! and announce nothing.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tracing::debug;

use super::filter::SortOrder;
use super::notifier::{ChangeEvent, ChangeNotifier, SubscriptionId};
use super::unique_list::{StoreError, UniqueList};
use crate::domain::{Employee, ExpenseClaim, Record, RecruitmentPosting, Schedule, Sortable};

pub type EmployeeStore = EntityStore<Employee>;
pub type ScheduleStore = EntityStore<Schedule>;
pub type ClaimStore = EntityStore<ExpenseClaim>;
pub type PostingStore = EntityStore<RecruitmentPosting>;

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
pub struct EntityStore<T> {
    id: u64,
    list: UniqueList<T>,
    notifier: ChangeNotifier<T>,
    revision: u64,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            id: NEXT_STORE_ID.fetch_add(1, AtomicOrdering::Relaxed),
            list: UniqueList::default(),
            notifier: ChangeNotifier::default(),
            revision: 0,
        }
    }
}

impl<T: Record> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding a copy of `records`
    pub fn from_records(records: &[T]) -> Result<Self, StoreError> {
        let mut store = Self::new();
        store.list.set_all(records.to_vec())?;
        Ok(store)
    }

    pub fn contains(&self, record: &T) -> bool {
        self.list.contains(record)
    }

    pub fn add(&mut self, record: T) -> Result<(), StoreError> {
        self.list.add(record)?;
        self.changed("add");
        Ok(())
    }

    /// Removes the record with the same identity and returns it
    pub fn remove(&mut self, record: &T) -> Result<T, StoreError> {
        let removed = self.list.remove(record)?;
        self.changed("remove");
        Ok(removed)
    }

    /// Replaces `target` in place; returns the replaced record
    pub fn replace(&mut self, target: &T, edited: T) -> Result<T, StoreError> {
        let old = self.list.replace(target, edited)?;
        self.changed("replace");
        Ok(old)
    }

    pub fn set_all(&mut self, records: Vec<T>) -> Result<(), StoreError> {
        self.list.set_all(records)?;
        self.changed("set_all");
        Ok(())
    }

    /// Resets the contents from a read-only source, such as a loaded snapshot
    ///
    /// Rejects a source that holds two records with one identity, so nothing
    /// is silently dropped.
    pub fn reset_from(&mut self, source: &[T]) -> Result<(), StoreError> {
        self.list.set_all(source.to_vec())?;
        self.changed("reset");
        Ok(())
    }

    /// Stable in-place reorder; announced like any other mutation
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.list.sort_by(compare);
        self.changed("sort");
    }

    /// First record matching a predicate
    pub fn find<P>(&self, predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.list.find(predicate)
    }

    /// Read-only view of the current contents
    pub fn as_slice(&self) -> &[T] {
        self.list.as_slice()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Distinct for every store created in this process
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Incremented by every successful mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent<'_, T>) + 'static,
    {
        self.notifier.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    fn changed(&mut self, operation: &'static str) {
        self.revision += 1;
        debug!(
            kind = %T::KIND,
            operation,
            revision = self.revision,
            len = self.list.len(),
            "store changed"
        );
        self.notifier.emit(&ChangeEvent {
            kind: T::KIND,
            revision: self.revision,
            contents: self.list.as_slice(),
        });
    }
}

impl<T: Record + Sortable> EntityStore<T> {
    /// Sorts the stored records by a chain of keys
    pub fn sort_by_order(&mut self, order: &SortOrder<T::Key>) {
        self.sort_by(|a, b| order.compare(a, b));
    }
}

impl<'a, T> IntoIterator for &'a EntityStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        (&self.list).into_iter()
    }
}
