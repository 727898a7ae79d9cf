//! The record book: four entity stores and their views
//!
//! Each collection pairs an [`EntityStore`] with the [`FilteredView`]
//! currently shown for it. The book adds the rules that span collections:
//!
//! - schedules and claims must reference an existing employee
//! - removing an employee also removes their schedules and claims
//! - changing an employee's id moves their schedules and claims to the new id
//!
//! These multi-store changes run as a sequence of ordinary store mutations,
//! each announced on its own. Every check runs before the first mutation, so
//! a rejected change leaves all four stores untouched.

use tracing::debug;

use super::filter::{Predicate, SortOrder};
use super::snapshot::BookSnapshot;
use super::store::EntityStore;
use super::unique_list::{StoreError, UniqueList};
use super::view::FilteredView;
use crate::domain::{
    ClaimStatus, Date, Employee, EmployeeId, ExpenseClaim, Record, RecordKind, RecruitmentPosting,
    Schedule, Searchable, Sortable,
};

/// A store plus the view currently shown over it
pub struct Collection<T: Searchable + Sortable> {
    store: EntityStore<T>,
    view: FilteredView<T>,
}

impl<T: Searchable + Sortable> Default for Collection<T> {
    fn default() -> Self {
        Self {
            store: EntityStore::default(),
            view: FilteredView::default(),
        }
    }
}

impl<T: Record + Searchable + Sortable> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &EntityStore<T> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EntityStore<T> {
        &mut self.store
    }

    pub fn view(&self) -> &FilteredView<T> {
        &self.view
    }

    /// Records visible through the current view
    pub fn records(&self) -> Vec<&T> {
        self.view.records(&self.store)
    }

    pub fn update_filter(&mut self, predicate: Predicate<T::Field>) {
        self.view.set_predicate(predicate);
    }

    pub fn update_order(&mut self, order: SortOrder<T::Key>) {
        self.view.set_order(order);
    }

    /// Shows every record again, in store order
    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    /// Applies a new predicate and/or order, then returns the resulting view
    pub fn view_with(
        &mut self,
        predicate: Option<Predicate<T::Field>>,
        order: Option<SortOrder<T::Key>>,
    ) -> Vec<&T> {
        if let Some(predicate) = predicate {
            self.view.set_predicate(predicate);
        }
        if let Some(order) = order {
            self.view.set_order(order);
        }
        self.records()
    }
}

/// What was removed along with an employee
#[derive(Debug, Clone)]
pub struct RemovedEmployee {
    pub employee: Employee,
    pub schedules: usize,
    pub claims: usize,
}

#[derive(Default)]
pub struct RecordBook {
    employees: Collection<Employee>,
    schedules: Collection<Schedule>,
    claims: Collection<ExpenseClaim>,
    postings: Collection<RecruitmentPosting>,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from a snapshot, rejecting any identity collision
    pub fn from_snapshot(snapshot: &BookSnapshot) -> Result<Self, StoreError> {
        let mut book = Self::new();
        book.reset_from(snapshot)?;
        Ok(book)
    }

    /// Replaces all four collections at once
    ///
    /// Every collection is checked before any is replaced, so a bad snapshot
    /// loads nothing.
    pub fn reset_from(&mut self, snapshot: &BookSnapshot) -> Result<(), StoreError> {
        UniqueList::check_unique(&snapshot.employees)?;
        UniqueList::check_unique(&snapshot.schedules)?;
        UniqueList::check_unique(&snapshot.claims)?;
        UniqueList::check_unique(&snapshot.postings)?;

        self.employees.store.reset_from(&snapshot.employees)?;
        self.schedules.store.reset_from(&snapshot.schedules)?;
        self.claims.store.reset_from(&snapshot.claims)?;
        self.postings.store.reset_from(&snapshot.postings)?;

        debug!(records = snapshot.record_count(), "record book reset");
        Ok(())
    }

    /// Copies the current contents of every store
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            employees: self.employees.store.as_slice().to_vec(),
            schedules: self.schedules.store.as_slice().to_vec(),
            claims: self.claims.store.as_slice().to_vec(),
            postings: self.postings.store.as_slice().to_vec(),
        }
    }

    /// Empties every store
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.reset_from(&BookSnapshot::default())
    }

    pub fn employees(&self) -> &Collection<Employee> {
        &self.employees
    }

    pub fn employees_mut(&mut self) -> &mut Collection<Employee> {
        &mut self.employees
    }

    pub fn schedules(&self) -> &Collection<Schedule> {
        &self.schedules
    }

    pub fn schedules_mut(&mut self) -> &mut Collection<Schedule> {
        &mut self.schedules
    }

    pub fn claims(&self) -> &Collection<ExpenseClaim> {
        &self.claims
    }

    pub fn claims_mut(&mut self) -> &mut Collection<ExpenseClaim> {
        &mut self.claims
    }

    pub fn postings(&self) -> &Collection<RecruitmentPosting> {
        &self.postings
    }

    pub fn postings_mut(&mut self) -> &mut Collection<RecruitmentPosting> {
        &mut self.postings
    }

    // =========================================================================
    // Employees
    // =========================================================================

    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.store.find(|e| &e.id == id)
    }

    pub fn add_employee(&mut self, employee: Employee) -> Result<(), StoreError> {
        self.employees.store.add(employee)
    }

    /// Replaces the employee with id `id`; returns the previous record
    pub fn edit_employee(&mut self, id: &EmployeeId, edited: Employee) -> Result<Employee, StoreError> {
        let target = self.require_employee(id)?.clone();

        if target.id == edited.id {
            return self.employees.store.replace(&target, edited);
        }

        if self.employee(&edited.id).is_some() {
            return Err(StoreError::duplicate(&edited));
        }

        let schedules: Vec<Schedule> = self
            .schedules
            .store
            .iter()
            .map(|s| {
                let mut s = s.clone();
                if s.employee_id == target.id {
                    s.employee_id = edited.id.clone();
                }
                s
            })
            .collect();
        let claims: Vec<ExpenseClaim> = self
            .claims
            .store
            .iter()
            .map(|c| {
                let mut c = c.clone();
                if c.employee_id == target.id {
                    c.employee_id = edited.id.clone();
                }
                c
            })
            .collect();
        UniqueList::check_unique(&schedules)?;
        UniqueList::check_unique(&claims)?;

        let moved_schedules = self.schedules_of(&target.id).len();
        let moved_claims = self.claims_of(&target.id).len();

        let old = self.employees.store.replace(&target, edited)?;
        if moved_schedules > 0 {
            self.schedules.store.set_all(schedules)?;
        }
        if moved_claims > 0 {
            self.claims.store.set_all(claims)?;
        }
        Ok(old)
    }

    /// Removes an employee together with their schedules and claims
    pub fn remove_employee(&mut self, id: &EmployeeId) -> Result<RemovedEmployee, StoreError> {
        let target = self.require_employee(id)?.clone();
        let employee = self.employees.store.remove(&target)?;

        let schedules = remove_owned_by(&mut self.schedules.store, id, |s: &Schedule| &s.employee_id)?;
        let claims = remove_owned_by(&mut self.claims.store, id, |c: &ExpenseClaim| &c.employee_id)?;

        Ok(RemovedEmployee {
            employee,
            schedules,
            claims,
        })
    }

    // =========================================================================
    // Schedules
    // =========================================================================

    pub fn schedule(&self, id: &EmployeeId, date: &Date) -> Option<&Schedule> {
        self.schedules
            .store
            .find(|s| &s.employee_id == id && &s.date == date)
    }

    /// Schedule entries of one employee, in store order
    pub fn schedules_of(&self, id: &EmployeeId) -> Vec<&Schedule> {
        self.schedules
            .store
            .iter()
            .filter(|s| &s.employee_id == id)
            .collect()
    }

    pub fn add_schedule(&mut self, schedule: Schedule) -> Result<(), StoreError> {
        self.require_employee(&schedule.employee_id)?;
        self.schedules.store.add(schedule)
    }

    pub fn replace_schedule(&mut self, target: &Schedule, edited: Schedule) -> Result<Schedule, StoreError> {
        self.require_employee(&edited.employee_id)?;
        self.schedules.store.replace(target, edited)
    }

    pub fn remove_schedule(&mut self, target: &Schedule) -> Result<Schedule, StoreError> {
        self.schedules.store.remove(target)
    }

    // =========================================================================
    // Expense claims
    // =========================================================================

    pub fn claims_of(&self, id: &EmployeeId) -> Vec<&ExpenseClaim> {
        self.claims
            .store
            .iter()
            .filter(|c| &c.employee_id == id)
            .collect()
    }

    pub fn add_claim(&mut self, claim: ExpenseClaim) -> Result<(), StoreError> {
        self.require_employee(&claim.employee_id)?;
        self.claims.store.add(claim)
    }

    pub fn replace_claim(&mut self, target: &ExpenseClaim, edited: ExpenseClaim) -> Result<ExpenseClaim, StoreError> {
        self.require_employee(&edited.employee_id)?;
        self.claims.store.replace(target, edited)
    }

    pub fn remove_claim(&mut self, target: &ExpenseClaim) -> Result<ExpenseClaim, StoreError> {
        self.claims.store.remove(target)
    }

    /// Records a decision on a claim; returns the updated claim
    pub fn set_claim_status(
        &mut self,
        target: &ExpenseClaim,
        status: ClaimStatus,
    ) -> Result<ExpenseClaim, StoreError> {
        let current = self
            .claims
            .store
            .find(|c| c.is_same(target))
            .ok_or_else(|| StoreError::not_found(target))?;
        let updated = current.with_status(status);
        self.claims.store.replace(target, updated.clone())?;
        Ok(updated)
    }

    // =========================================================================
    // Recruitment postings
    // =========================================================================

    pub fn add_posting(&mut self, posting: RecruitmentPosting) -> Result<(), StoreError> {
        self.postings.store.add(posting)
    }

    pub fn replace_posting(
        &mut self,
        target: &RecruitmentPosting,
        edited: RecruitmentPosting,
    ) -> Result<RecruitmentPosting, StoreError> {
        self.postings.store.replace(target, edited)
    }

    pub fn remove_posting(&mut self, target: &RecruitmentPosting) -> Result<RecruitmentPosting, StoreError> {
        self.postings.store.remove(target)
    }

    fn require_employee(&self, id: &EmployeeId) -> Result<&Employee, StoreError> {
        self.employee(id)
            .ok_or_else(|| StoreError::UnknownEmployee(id.clone()))
    }
}

/// Drops every record that belongs to `id`; returns how many
fn remove_owned_by<T: Record>(
    store: &mut EntityStore<T>,
    id: &EmployeeId,
    owner: impl Fn(&T) -> &EmployeeId,
) -> Result<usize, StoreError> {
    let kept: Vec<T> = store.iter().filter(|r| owner(*r) != id).cloned().collect();
    let removed = store.len() - kept.len();
    if removed > 0 {
        store.set_all(kept)?;
        debug!(kind = %T::KIND, employee = %id, removed, "removed records of employee");
    }
    Ok(removed)
}

impl RecordBook {
    /// Number of records in the store of the given kind
    pub fn count(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Employee => self.employees.store.len(),
            RecordKind::Schedule => self.schedules.store.len(),
            RecordKind::ExpenseClaim => self.claims.store.len(),
            RecordKind::RecruitmentPosting => self.postings.store.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmployeeField, Shift};
    use crate::model::sample::sample_snapshot;
    use std::cell::RefCell;
    use std::rc::Rc;

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

    fn schedule(id: &str, date: &str) -> Schedule {
        Schedule::new(id.parse().unwrap(), date.parse().unwrap(), Shift::Full)
    }

    fn claim(id: &str, description: &str) -> ExpenseClaim {
        ExpenseClaim::new(
            id.parse().unwrap(),
            "01/02/2024".parse().unwrap(),
            "10".parse().unwrap(),
            description.parse().unwrap(),
        )
    }

    fn book_with_alex() -> RecordBook {
        let mut book = RecordBook::new();
        book.add_employee(employee("000001", "Alex Yeoh")).unwrap();
        book.add_schedule(schedule("000001", "01/01/2019")).unwrap();
        book.add_claim(claim("000001", "Taxi")).unwrap();
        book
    }

    #[test]
    fn schedule_requires_known_employee() {
        let mut book = RecordBook::new();
        let err = book.add_schedule(schedule("000009", "01/01/2019")).unwrap_err();
        assert_eq!(err, StoreError::UnknownEmployee("000009".parse().unwrap()));
        assert!(book.schedules().store().is_empty());
    }

    #[test]
    fn claim_requires_known_employee() {
        let mut book = RecordBook::new();
        assert!(matches!(
            book.add_claim(claim("000009", "Taxi")),
            Err(StoreError::UnknownEmployee(_))
        ));
    }

    #[test]
    fn removing_employee_cascades() {
        let mut book = book_with_alex();
        book.add_employee(employee("000002", "Bernice Yu")).unwrap();
        book.add_schedule(schedule("000002", "01/01/2019")).unwrap();

        let removed = book.remove_employee(&"000001".parse().unwrap()).unwrap();

        assert_eq!(removed.schedules, 1);
        assert_eq!(removed.claims, 1);
        assert_eq!(book.schedules().store().len(), 1);
        assert!(book.claims().store().is_empty());
    }

    #[test]
    fn changing_employee_id_moves_their_records() {
        let mut book = book_with_alex();
        let id = "000001".parse().unwrap();

        book.edit_employee(&id, employee("000007", "Alex Yeoh")).unwrap();

        assert!(book.employee(&id).is_none());
        let new_id: EmployeeId = "000007".parse().unwrap();
        assert_eq!(book.schedules_of(&new_id).len(), 1);
        assert_eq!(book.claims_of(&new_id).len(), 1);
    }

    #[test]
    fn changing_employee_id_to_taken_id_changes_nothing() {
        let mut book = book_with_alex();
        book.add_employee(employee("000002", "Bernice Yu")).unwrap();
        let before = book.snapshot();

        let err = book
            .edit_employee(&"000001".parse().unwrap(), employee("000002", "Alex Yeoh"))
            .unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(book.snapshot(), before);
    }

    #[test]
    fn editing_non_key_field_keeps_position() {
        let mut book = RecordBook::new();
        book.add_employee(employee("000001", "Alex Yeoh")).unwrap();
        book.add_employee(employee("000002", "Bernice Yu")).unwrap();
        book.add_employee(employee("000003", "Charlotte Oliveiro")).unwrap();

        let old = book
            .edit_employee(&"000002".parse().unwrap(), employee("000002", "Bernice Tan"))
            .unwrap();

        assert_eq!(old.name.as_str(), "Bernice Yu");
        let names: Vec<_> = book
            .employees()
            .store()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alex Yeoh", "Bernice Tan", "Charlotte Oliveiro"]);
    }

    #[test]
    fn claim_status_update() {
        let mut book = book_with_alex();
        let target = claim("000001", "Taxi");

        let updated = book.set_claim_status(&target, ClaimStatus::Approved).unwrap();

        assert_eq!(updated.status, ClaimStatus::Approved);
        assert_eq!(book.claims().store().as_slice()[0].status, ClaimStatus::Approved);
    }

    #[test]
    fn reset_with_collision_loads_nothing() {
        let mut book = book_with_alex();
        let before = book.snapshot();

        let mut bad = sample_snapshot().unwrap();
        let first = bad.postings[0].clone();
        bad.postings.push(first);

        assert!(book.reset_from(&bad).unwrap_err().is_duplicate());
        assert_eq!(book.snapshot(), before);
    }

    #[test]
    fn snapshot_roundtrip_preserves_order() {
        let sample = sample_snapshot().unwrap();
        let book = RecordBook::from_snapshot(&sample).unwrap();
        assert_eq!(book.snapshot(), sample);
    }

    #[test]
    fn collection_view_with_filters() {
        let mut book = RecordBook::from_snapshot(&sample_snapshot().unwrap()).unwrap();
        let engineers = book
            .employees_mut()
            .view_with(Some(Predicate::any_word(EmployeeField::Department, ["engineering"])), None);
        assert_eq!(engineers.len(), 2);

        book.employees_mut().reset_view();
        assert_eq!(book.employees().records().len(), book.count(RecordKind::Employee));
    }

    #[test]
    fn clear_notifies_every_store() {
        let mut book = book_with_alex();
        let fired = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&fired);
        book.employees_mut()
            .store_mut()
            .subscribe(move |e| {
                assert!(e.contents.is_empty());
                *sink.borrow_mut() += 1;
            });

        book.clear().unwrap();

        assert_eq!(*fired.borrow(), 1);
        assert_eq!(book.count(RecordKind::Schedule), 0);
    }
}
