//! Employee records
//!
//! An employee is identified by its employee id alone; every other field can
//! be edited in place.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fields::{Amount, Department, Email, EmployeeId, JobTitle, Name, Phone, Tag, ValidationError};
use super::record::{Record, RecordKind, Searchable, Sortable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: Name,
    pub phone: Phone,
    pub email: Email,
    pub department: Department,
    pub position: JobTitle,
    pub salary: Amount,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<Tag>,
}

impl Employee {
    /// Creates an employee with no tags
    pub fn new(
        id: EmployeeId,
        name: Name,
        phone: Phone,
        email: Email,
        department: Department,
        position: JobTitle,
        salary: Amount,
    ) -> Self {
        Self {
            id,
            name,
            phone,
            email,
            department,
            position,
            salary,
            tags: BTreeSet::new(),
        }
    }

    /// Returns a copy with the given tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }
}

impl Record for Employee {
    const KIND: RecordKind = RecordKind::Employee;

    fn is_same(&self, other: &Self) -> bool {
        self.id == other.id
    }

    fn is_identical(&self, other: &Self) -> bool {
        self == other
    }

    fn identity(&self) -> String {
        format!("id {}", self.id)
    }
}

/// Searchable employee fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeField {
    Id,
    Name,
    Phone,
    Email,
    Department,
    Position,
    Tags,
}

impl Searchable for Employee {
    type Field = EmployeeField;

    fn field_text(&self, field: EmployeeField) -> Cow<'_, str> {
        match field {
            EmployeeField::Id => Cow::Borrowed(self.id.as_str()),
            EmployeeField::Name => Cow::Borrowed(self.name.as_str()),
            EmployeeField::Phone => Cow::Borrowed(self.phone.as_str()),
            EmployeeField::Email => Cow::Borrowed(self.email.as_str()),
            EmployeeField::Department => Cow::Borrowed(self.department.as_str()),
            EmployeeField::Position => Cow::Borrowed(self.position.as_str()),
            EmployeeField::Tags => Cow::Owned(
                self.tags
                    .iter()
                    .map(Tag::as_str)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        }
    }
}

/// Employee sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeSortKey {
    Id,
    Name,
    Department,
    Salary,
}

impl Sortable for Employee {
    type Key = EmployeeSortKey;

    fn compare_by(&self, other: &Self, key: EmployeeSortKey) -> Ordering {
        match key {
            EmployeeSortKey::Id => self.id.cmp_numeric(&other.id),
            EmployeeSortKey::Name => self
                .name
                .as_str()
                .to_lowercase()
                .cmp(&other.name.as_str().to_lowercase()),
            EmployeeSortKey::Department => self
                .department
                .as_str()
                .to_lowercase()
                .cmp(&other.department.as_str().to_lowercase()),
            EmployeeSortKey::Salary => self.salary.cmp(&other.salary),
        }
    }
}

impl FromStr for EmployeeSortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "department" => Ok(Self::Department),
            "salary" => Ok(Self::Salary),
            _ => Err(ValidationError::new(
                "sort key",
                s,
                "Employees can be sorted by: id, name, department, salary",
            )),
        }
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}; Phone: {}; Email: {}; Department: {}; Position: {}; Salary: {}",
            self.id, self.name, self.phone, self.email, self.department, self.position, self.salary
        )?;
        if !self.tags.is_empty() {
            let tags: Vec<_> = self.tags.iter().map(Tag::as_str).collect();
            write!(f, "; Tags: [{}]", tags.join(", "))?;
        }
        Ok(())
    }
}
