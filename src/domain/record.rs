//! Common contracts shared by every record kind

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The four collections held by a record book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Employee,
    Schedule,
    ExpenseClaim,
    RecruitmentPosting,
}

impl RecordKind {
    /// Singular label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Employee => "employee",
            RecordKind::Schedule => "schedule",
            RecordKind::ExpenseClaim => "expense claim",
            RecordKind::RecruitmentPosting => "recruitment posting",
        }
    }

    /// Plural label used in listings
    pub fn plural(&self) -> &'static str {
        match self {
            RecordKind::Employee => "employees",
            RecordKind::Schedule => "schedules",
            RecordKind::ExpenseClaim => "expense claims",
            RecordKind::RecruitmentPosting => "recruitment postings",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A record that can live in a unique list
///
/// Records are compared two ways, and callers pick one explicitly:
/// - [`Record::is_same`] looks only at the natural key and decides uniqueness
/// - [`Record::is_identical`] looks at every field
pub trait Record: Clone + fmt::Debug {
    const KIND: RecordKind;

    /// True if both records share the same natural key
    fn is_same(&self, other: &Self) -> bool;

    /// True if every field is equal
    fn is_identical(&self, other: &Self) -> bool;

    /// Human-readable rendering of the natural key, for messages
    fn identity(&self) -> String;
}

/// Exposes named text fields for predicate matching
pub trait Searchable {
    type Field: Copy + fmt::Debug + PartialEq;

    /// Text of the given field; multi-valued fields are joined with spaces
    fn field_text(&self, field: Self::Field) -> Cow<'_, str>;
}

/// Exposes named sort keys for comparators
pub trait Sortable {
    type Key: Copy + fmt::Debug + PartialEq;

    fn compare_by(&self, other: &Self, key: Self::Key) -> Ordering;
}
