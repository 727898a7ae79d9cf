//! Recruitment postings for open positions

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fields::{Amount, Department, Description, JobTitle, ValidationError, Vacancies};
use super::record::{Record, RecordKind, Searchable, Sortable};

/// An open position; one posting per job title and department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruitmentPosting {
    pub job_title: JobTitle,
    pub department: Department,
    pub salary: Amount,
    pub vacancies: Vacancies,
    pub requirements: Description,
}

impl RecruitmentPosting {
    pub fn new(
        job_title: JobTitle,
        department: Department,
        salary: Amount,
        vacancies: Vacancies,
        requirements: Description,
    ) -> Self {
        Self {
            job_title,
            department,
            salary,
            vacancies,
            requirements,
        }
    }
}

impl Record for RecruitmentPosting {
    const KIND: RecordKind = RecordKind::RecruitmentPosting;

    fn is_same(&self, other: &Self) -> bool {
        self.job_title == other.job_title && self.department == other.department
    }

    fn is_identical(&self, other: &Self) -> bool {
        self == other
    }

    fn identity(&self) -> String {
        format!("{} in {}", self.job_title, self.department)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingField {
    JobTitle,
    Department,
    Requirements,
}

impl Searchable for RecruitmentPosting {
    type Field = PostingField;

    fn field_text(&self, field: PostingField) -> Cow<'_, str> {
        match field {
            PostingField::JobTitle => Cow::Borrowed(self.job_title.as_str()),
            PostingField::Department => Cow::Borrowed(self.department.as_str()),
            PostingField::Requirements => Cow::Borrowed(self.requirements.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingSortKey {
    JobTitle,
    Department,
    Salary,
    Vacancies,
}

impl Sortable for RecruitmentPosting {
    type Key = PostingSortKey;

    fn compare_by(&self, other: &Self, key: PostingSortKey) -> Ordering {
        match key {
            PostingSortKey::JobTitle => self
                .job_title
                .as_str()
                .to_lowercase()
                .cmp(&other.job_title.as_str().to_lowercase()),
            PostingSortKey::Department => self
                .department
                .as_str()
                .to_lowercase()
                .cmp(&other.department.as_str().to_lowercase()),
            PostingSortKey::Salary => self.salary.cmp(&other.salary),
            PostingSortKey::Vacancies => self.vacancies.cmp(&other.vacancies),
        }
    }
}

impl FromStr for PostingSortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(Self::JobTitle),
            "department" => Ok(Self::Department),
            "salary" => Ok(Self::Salary),
            "vacancies" => Ok(Self::Vacancies),
            _ => Err(ValidationError::new(
                "sort key",
                s,
                "Postings can be sorted by: title, department, salary, vacancies",
            )),
        }
    }
}

impl fmt::Display for RecruitmentPosting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}); Salary: {}; Vacancies: {}; Requirements: {}",
            self.job_title, self.department, self.salary, self.vacancies, self.requirements
        )
    }
}
