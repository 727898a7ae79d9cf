//! Point-in-time copy of every collection in a record book

use serde::{Deserialize, Serialize};

use crate::domain::{Employee, ExpenseClaim, RecruitmentPosting, Schedule};

/// Full contents of a record book, in store order
///
/// This is the document the persistence layer reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookSnapshot {
    pub employees: Vec<Employee>,
    pub schedules: Vec<Schedule>,
    pub claims: Vec<ExpenseClaim>,
    pub postings: Vec<RecruitmentPosting>,
}

impl BookSnapshot {
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
            && self.schedules.is_empty()
            && self.claims.is_empty()
            && self.postings.is_empty()
    }

    /// Total number of records across all collections
    pub fn record_count(&self) -> usize {
        self.employees.len() + self.schedules.len() + self.claims.len() + self.postings.len()
    }
}
