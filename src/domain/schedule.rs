//! Work schedule entries
//!
//! An employee has at most one schedule entry per date.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fields::{Date, Description, EmployeeId, Shift, ValidationError};
use super::record::{Record, RecordKind, Searchable, Sortable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub employee_id: EmployeeId,
    pub date: Date,
    pub shift: Shift,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<Description>,
}

impl Schedule {
    pub fn new(employee_id: EmployeeId, date: Date, shift: Shift) -> Self {
        Self {
            employee_id,
            date,
            shift,
            remark: None,
        }
    }

    pub fn with_remark(mut self, remark: Description) -> Self {
        self.remark = Some(remark);
        self
    }
}

impl Record for Schedule {
    const KIND: RecordKind = RecordKind::Schedule;

    fn is_same(&self, other: &Self) -> bool {
        self.employee_id == other.employee_id && self.date == other.date
    }

    fn is_identical(&self, other: &Self) -> bool {
        self == other
    }

    fn identity(&self) -> String {
        format!("employee {} on {}", self.employee_id, self.date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleField {
    EmployeeId,
    Date,
    Shift,
    Remark,
}

impl Searchable for Schedule {
    type Field = ScheduleField;

    fn field_text(&self, field: ScheduleField) -> Cow<'_, str> {
        match field {
            ScheduleField::EmployeeId => Cow::Borrowed(self.employee_id.as_str()),
            ScheduleField::Date => Cow::Owned(self.date.to_string()),
            ScheduleField::Shift => Cow::Borrowed(self.shift.as_str()),
            ScheduleField::Remark => self
                .remark
                .as_ref()
                .map(|r| Cow::Borrowed(r.as_str()))
                .unwrap_or(Cow::Borrowed("")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSortKey {
    /// Calendar order
    Date,
    /// Numeric employee id order
    EmployeeId,
    Shift,
}

impl Sortable for Schedule {
    type Key = ScheduleSortKey;

    fn compare_by(&self, other: &Self, key: ScheduleSortKey) -> Ordering {
        match key {
            ScheduleSortKey::Date => self.date.cmp(&other.date),
            ScheduleSortKey::EmployeeId => self.employee_id.cmp_numeric(&other.employee_id),
            ScheduleSortKey::Shift => self.shift.cmp(&other.shift),
        }
    }
}

impl FromStr for ScheduleSortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "id" | "employee" => Ok(Self::EmployeeId),
            "shift" => Ok(Self::Shift),
            _ => Err(ValidationError::new(
                "sort key",
                s,
                "Schedules can be sorted by: date, id, shift",
            )),
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.date, self.employee_id, self.shift)?;
        if let Some(remark) = &self.remark {
            write!(f, "; Remark: {}", remark)?;
        }
        Ok(())
    }
}
