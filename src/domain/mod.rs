//! Domain models for the staff record book
//!
//! Validated field types and the four record kinds, without any I/O concerns.

mod claim;
mod employee;
mod fields;
mod posting;
mod record;
mod schedule;

pub use claim::{ClaimField, ClaimSortKey, ExpenseClaim};
pub use employee::{Employee, EmployeeField, EmployeeSortKey};
pub use fields::{
    Amount, ClaimStatus, Date, Department, Description, Email, EmployeeId, JobTitle, Name, Phone,
    Shift, Tag, Vacancies, ValidationError,
};
pub use posting::{PostingField, PostingSortKey, RecruitmentPosting};
pub use record::{Record, RecordKind, Searchable, Sortable};
pub use schedule::{Schedule, ScheduleField, ScheduleSortKey};
