//! Expense claims filed by employees

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fields::{Amount, ClaimStatus, Date, Description, EmployeeId, ValidationError};
use super::record::{Record, RecordKind, Searchable, Sortable};

/// An expense claim
///
/// A claim is keyed by who filed it, when, and what it was for, so the same
/// employee can claim twice on one day for different expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseClaim {
    pub employee_id: EmployeeId,
    pub date: Date,
    pub amount: Amount,
    pub description: Description,
    #[serde(default)]
    pub status: ClaimStatus,
}

impl ExpenseClaim {
    /// Creates a pending claim
    pub fn new(employee_id: EmployeeId, date: Date, amount: Amount, description: Description) -> Self {
        Self {
            employee_id,
            date,
            amount,
            description,
            status: ClaimStatus::Pending,
        }
    }

    /// Returns a copy carrying the given status
    pub fn with_status(&self, status: ClaimStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

impl Record for ExpenseClaim {
    const KIND: RecordKind = RecordKind::ExpenseClaim;

    fn is_same(&self, other: &Self) -> bool {
        self.employee_id == other.employee_id
            && self.date == other.date
            && self.description == other.description
    }

    fn is_identical(&self, other: &Self) -> bool {
        self == other
    }

    fn identity(&self) -> String {
        format!(
            "employee {} on {} for '{}'",
            self.employee_id, self.date, self.description
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimField {
    EmployeeId,
    Date,
    Description,
    Status,
}

impl Searchable for ExpenseClaim {
    type Field = ClaimField;

    fn field_text(&self, field: ClaimField) -> Cow<'_, str> {
        match field {
            ClaimField::EmployeeId => Cow::Borrowed(self.employee_id.as_str()),
            ClaimField::Date => Cow::Owned(self.date.to_string()),
            ClaimField::Description => Cow::Borrowed(self.description.as_str()),
            ClaimField::Status => Cow::Borrowed(self.status.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimSortKey {
    Date,
    Amount,
    EmployeeId,
}

impl Sortable for ExpenseClaim {
    type Key = ClaimSortKey;

    fn compare_by(&self, other: &Self, key: ClaimSortKey) -> Ordering {
        match key {
            ClaimSortKey::Date => self.date.cmp(&other.date),
            ClaimSortKey::Amount => self.amount.cmp(&other.amount),
            ClaimSortKey::EmployeeId => self.employee_id.cmp_numeric(&other.employee_id),
        }
    }
}

impl FromStr for ClaimSortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            "id" | "employee" => Ok(Self::EmployeeId),
            _ => Err(ValidationError::new(
                "sort key",
                s,
                "Claims can be sorted by: date, amount, id",
            )),
        }
    }
}

impl fmt::Display for ExpenseClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ${} [{}] {}",
            self.date, self.employee_id, self.amount, self.status, self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(description: &str, amount: &str) -> ExpenseClaim {
        ExpenseClaim::new(
            "000001".parse().unwrap(),
            "12/03/2024".parse().unwrap(),
            amount.parse().unwrap(),
            description.parse().unwrap(),
        )
    }

    #[test]
    fn new_claims_are_pending() {
        assert_eq!(claim("Taxi", "12").status, ClaimStatus::Pending);
    }

    #[test]
    fn status_change_keeps_identity() {
        let pending = claim("Taxi", "12");
        let approved = pending.with_status(ClaimStatus::Approved);

        assert!(pending.is_same(&approved));
        assert!(!pending.is_identical(&approved));
    }

    #[test]
    fn different_description_is_a_different_claim() {
        let taxi = claim("Taxi", "12");
        let lunch = claim("Client lunch", "12");

        assert!(!taxi.is_same(&lunch));
    }

    #[test]
    fn amount_sort_key() {
        let small = claim("Taxi", "9.50");
        let large = claim("Hotel", "120");
        assert_eq!(small.compare_by(&large, ClaimSortKey::Amount), Ordering::Less);
    }

    #[test]
    fn status_defaults_when_missing_from_json() {
        let json = r#"{"employee_id":"000001","date":"12/03/2024","amount":"12.00","description":"Taxi"}"#;
        let parsed: ExpenseClaim = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, ClaimStatus::Pending);
    }
}
