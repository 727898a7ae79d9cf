//! staffbook - a single-user records manager for a small organisation
//!
//! Keeps four related collections (employees, their work schedules, their
//! expense claims and open recruitment postings) in duplicate-free in-memory
//! stores, serves filtered and sorted views of them, and saves the whole
//! book to a JSON document after every change.

pub mod cli;
pub mod domain;
pub mod model;
pub mod storage;

pub use domain::{Employee, EmployeeId, ExpenseClaim, RecordKind, RecruitmentPosting, Schedule};
pub use model::{RecordBook, StoreError};
