//! Derived, read-only views over an entity store
//!
//! A view holds the active predicate and sort order and remembers which
//! store positions it showed last. The cached positions are keyed by the
//! store's id and revision, so reading another store or mutating this one
//! makes them stale and the next read recomputes them.

use std::cell::RefCell;

use super::filter::{Predicate, SortOrder};
use super::store::EntityStore;
use crate::domain::{Record, Searchable, Sortable};

struct Cached {
    store: u64,
    revision: u64,
    positions: Vec<usize>,
}

pub struct FilteredView<T: Searchable + Sortable> {
    predicate: Predicate<T::Field>,
    order: SortOrder<T::Key>,
    cache: RefCell<Option<Cached>>,
}

impl<T: Searchable + Sortable> Default for FilteredView<T> {
    fn default() -> Self {
        Self {
            predicate: Predicate::Always,
            order: SortOrder::default(),
            cache: RefCell::new(None),
        }
    }
}

impl<T: Record + Searchable + Sortable> FilteredView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predicate(&self) -> &Predicate<T::Field> {
        &self.predicate
    }

    pub fn order(&self) -> &SortOrder<T::Key> {
        &self.order
    }

    pub fn set_predicate(&mut self, predicate: Predicate<T::Field>) {
        self.predicate = predicate;
        self.invalidate();
    }

    pub fn set_order(&mut self, order: SortOrder<T::Key>) {
        self.order = order;
        self.invalidate();
    }

    /// Back to "show everything in store order"
    pub fn reset(&mut self) {
        self.predicate = Predicate::Always;
        self.order = SortOrder::default();
        self.invalidate();
    }

    /// Records currently visible through this view
    pub fn records<'a>(&self, store: &'a EntityStore<T>) -> Vec<&'a T> {
        let all = store.as_slice();
        self.positions(store).into_iter().map(|i| &all[i]).collect()
    }

    /// Number of visible records
    pub fn len(&self, store: &EntityStore<T>) -> usize {
        self.positions(store).len()
    }

    pub fn is_empty(&self, store: &EntityStore<T>) -> bool {
        self.len(store) == 0
    }

    fn positions(&self, store: &EntityStore<T>) -> Vec<usize> {
        let mut cache = self.cache.borrow_mut();
        if let Some(cached) = cache.as_ref() {
            if cached.store == store.id() && cached.revision == store.revision() {
                return cached.positions.clone();
            }
        }

        let all = store.as_slice();
        let mut positions: Vec<usize> = all
            .iter()
            .enumerate()
            .filter(|(_, r)| self.predicate.test(*r))
            .map(|(i, _)| i)
            .collect();
        if !self.order.is_unsorted() {
            positions.sort_by(|&a, &b| self.order.compare(&all[a], &all[b]));
        }

        *cache = Some(Cached {
            store: store.id(),
            revision: store.revision(),
            positions: positions.clone(),
        });
        positions
    }

    fn invalidate(&mut self) {
        *self.cache.get_mut() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Employee, EmployeeField, EmployeeSortKey};

    fn employee(id: &str, name: &str) -> Employee {
        Employee::new(
            id.parse().unwrap(),
            name.parse().unwrap(),
            "93210283".parse().unwrap(),
            "person@example.com".parse().unwrap(),
            "Engineering".parse().unwrap(),
            "Analyst".parse().unwrap(),
            "3000".parse().unwrap(),
        )
    }

    fn names(records: Vec<&Employee>) -> Vec<String> {
        records.iter().map(|e| e.name.to_string()).collect()
    }

    #[test]
    fn default_view_shows_store_order() {
        let mut store = EntityStore::new();
        store.add(employee("000002", "Bernice Yu")).unwrap();
        store.add(employee("000001", "Alex Yeoh")).unwrap();

        let view = FilteredView::new();
        assert_eq!(names(view.records(&store)), vec!["Bernice Yu", "Alex Yeoh"]);
    }

    #[test]
    fn view_filters_and_sorts_without_touching_store() {
        let mut store = EntityStore::new();
        store.add(employee("000010", "Alex Tan")).unwrap();
        store.add(employee("000002", "Bernice Yu")).unwrap();
        store.add(employee("000003", "Alex Yeoh")).unwrap();
        let revision = store.revision();

        let mut view = FilteredView::new();
        view.set_predicate(Predicate::any_word(EmployeeField::Name, ["alex"]));
        view.set_order(SortOrder::by(EmployeeSortKey::Id));

        assert_eq!(names(view.records(&store)), vec!["Alex Yeoh", "Alex Tan"]);
        assert_eq!(store.revision(), revision);
        assert_eq!(store.as_slice()[0].name.as_str(), "Alex Tan");
    }

    #[test]
    fn view_recomputes_after_store_mutation() {
        let mut store = EntityStore::new();
        store.add(employee("000001", "Alex Yeoh")).unwrap();

        let mut view = FilteredView::new();
        view.set_predicate(Predicate::any_word(EmployeeField::Name, ["alex"]));
        assert_eq!(view.len(&store), 1);

        store.add(employee("000002", "Alex Tan")).unwrap();
        assert_eq!(view.len(&store), 2);

        store.remove(&employee("000001", "Alex Yeoh")).unwrap();
        assert_eq!(names(view.records(&store)), vec!["Alex Tan"]);
    }

    #[test]
    fn reset_clears_predicate_and_order() {
        let mut store = EntityStore::new();
        store.add(employee("000001", "Alex Yeoh")).unwrap();
        store.add(employee("000002", "Bernice Yu")).unwrap();

        let mut view = FilteredView::new();
        view.set_predicate(Predicate::exact(EmployeeField::Id, "000002"));
        assert_eq!(view.len(&store), 1);

        view.reset();
        assert!(view.predicate().is_always());
        assert_eq!(view.len(&store), 2);
    }

    #[test]
    fn view_does_not_reuse_positions_across_stores() {
        let view = FilteredView::new();
        assert_eq!(view.len(&EntityStore::new()), 0);

        let filled =
            EntityStore::from_records(&[employee("000001", "Alex Yeoh"), employee("000002", "Bernice Yu")])
                .unwrap();
        assert_eq!(filled.revision(), 0);
        assert_eq!(view.len(&filled), 2);
        assert_eq!(names(view.records(&filled)), vec!["Alex Yeoh", "Bernice Yu"]);
    }
}
