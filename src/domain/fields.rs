//! Validated field types used by every record kind
//!
//! Every type here is an immutable wrapper that can only be built from input
//! that passes its validation rule. The same rule is available without
//! constructing a value through each type's `is_valid`.
//!
//! Field formats:
//! - `EmployeeId`: 1-6 digits (`000042`)
//! - `Date`: `dd/mm/yyyy`, a real calendar date
//! - `Amount`: non-negative decimal, at most 2 fraction digits (`1234.5`)
//!
//! All types serialize as their display string and are re-validated when
//! deserialized, so a hand-edited data file cannot smuggle in bad values.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A field value that failed its format constraint
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid {field} '{value}': {constraint}")]
pub struct ValidationError {
    field: &'static str,
    value: String,
    constraint: &'static str,
}

impl ValidationError {
    pub fn new(field: &'static str, value: impl Into<String>, constraint: &'static str) -> Self {
        Self {
            field,
            value: value.into(),
            constraint,
        }
    }

    /// Name of the field that was rejected
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Human-readable description of the rule that was broken
    pub fn constraint(&self) -> &'static str {
        self.constraint
    }
}

static EMPLOYEE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,6}$").unwrap());
static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}\p{N}]+( [\p{L}\p{N}]+)*$").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3,}$").unwrap());
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9](?:[A-Za-z0-9+_.-]*[A-Za-z0-9])?@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)*[A-Za-z0-9][A-Za-z0-9-]*[A-Za-z0-9]$",
    )
    .unwrap()
});
static UNIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N} &/-]*$").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}\p{N}]+$").unwrap());
static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,9})(?:\.([0-9]{1,2}))?$").unwrap());
static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").unwrap());

const MAX_UNIT_CHARS: usize = 50;
const MAX_DESCRIPTION_CHARS: usize = 200;
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Declares a string-backed field type with its validation rule.
///
/// The rule receives the trimmed input and decides validity; the stored value
/// is the trimmed input.
macro_rules! text_field {
    ($(#[$meta:meta])* $name:ident, $label:literal, $constraint:literal, $rule:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Human-readable constraint shown when validation fails
            pub const CONSTRAINT: &'static str = $constraint;

            /// Validates and wraps the input
            pub fn new(value: &str) -> Result<Self, ValidationError> {
                let trimmed = value.trim();
                if Self::is_valid(trimmed) {
                    Ok(Self(trimmed.to_string()))
                } else {
                    Err(ValidationError::new($label, value, Self::CONSTRAINT))
                }
            }

            /// Returns true if the input would be accepted by [`Self::new`]
            pub fn is_valid(value: &str) -> bool {
                let rule: fn(&str) -> bool = $rule;
                rule(value.trim())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

text_field!(
    /// Employee number, 1-6 digits, conventionally zero-padded
    EmployeeId,
    "employee id",
    "Employee IDs should contain only digits and be at most 6 digits long",
    |s| EMPLOYEE_ID_RE.is_match(s)
);

impl EmployeeId {
    /// Numeric value of the identifier (`000042` -> 42)
    pub fn numeric(&self) -> u32 {
        // at most 6 digits, cannot overflow
        self.0.parse().unwrap_or(0)
    }

    /// Orders by numeric value, falling back to the literal text so that
    /// `42` and `000042` still have a stable relative order.
    pub fn cmp_numeric(&self, other: &Self) -> Ordering {
        self.numeric()
            .cmp(&other.numeric())
            .then_with(|| self.0.cmp(&other.0))
    }
}

text_field!(
    /// A person's name
    Name,
    "name",
    "Names should only contain letters, digits and single spaces, and must not be blank",
    |s| NAME_RE.is_match(s)
);

text_field!(
    /// Contact phone number
    Phone,
    "phone",
    "Phone numbers should only contain digits and be at least 3 digits long",
    |s| PHONE_RE.is_match(s)
);

text_field!(
    /// Contact email address
    Email,
    "email",
    "Emails should be of the form local-part@domain; the local part may contain \
     letters, digits and +_.- (not at either end) and the domain must end with a \
     label of at least 2 characters",
    |s| EMAIL_RE.is_match(s)
);

text_field!(
    /// Organisational department
    Department,
    "department",
    "Departments should start with a letter or digit, contain only letters, digits, \
     spaces and &/- and be at most 50 characters",
    |s| UNIT_RE.is_match(s) && s.chars().count() <= MAX_UNIT_CHARS
);

text_field!(
    /// Job title (also used as an employee's position)
    JobTitle,
    "job title",
    "Job titles should start with a letter or digit, contain only letters, digits, \
     spaces and &/- and be at most 50 characters",
    |s| UNIT_RE.is_match(s) && s.chars().count() <= MAX_UNIT_CHARS
);

text_field!(
    /// Free-text description
    Description,
    "description",
    "Descriptions must not be blank and must be at most 200 characters",
    |s| !s.is_empty() && s.chars().count() <= MAX_DESCRIPTION_CHARS
);

text_field!(
    /// Single-word label attached to an employee
    Tag,
    "tag",
    "Tags should be a single word of letters and digits",
    |s| TAG_RE.is_match(s)
);

/// Money value held in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount {
    cents: u64,
}

impl Amount {
    pub const CONSTRAINT: &'static str =
        "Amounts should be a non-negative number with at most 2 decimal places";

    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        let caps = AMOUNT_RE
            .captures(trimmed)
            .ok_or_else(|| ValidationError::new("amount", value, Self::CONSTRAINT))?;

        let whole: u64 = caps[1]
            .parse()
            .map_err(|_| ValidationError::new("amount", value, Self::CONSTRAINT))?;
        let fraction = match caps.get(2) {
            Some(m) if m.as_str().len() == 1 => m.as_str().parse::<u64>().unwrap_or(0) * 10,
            Some(m) => m.as_str().parse::<u64>().unwrap_or(0),
            None => 0,
        };

        Ok(Self {
            cents: whole * 100 + fraction,
        })
    }

    pub fn is_valid(value: &str) -> bool {
        AMOUNT_RE.is_match(value.trim())
    }

    pub fn cents(&self) -> u64 {
        self.cents
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Amount {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}

/// Calendar date written as `dd/mm/yyyy`
///
/// Ordering is calendar order, not text order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Date(NaiveDate);

impl Date {
    pub const CONSTRAINT: &'static str = "Dates should be a valid calendar date in the format dd/mm/yyyy";

    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if !DATE_RE.is_match(trimmed) {
            return Err(ValidationError::new("date", value, Self::CONSTRAINT));
        }
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::new("date", value, Self::CONSTRAINT))
    }

    pub fn is_valid(value: &str) -> bool {
        Self::new(value).is_ok()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for Date {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Date {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Date> for String {
    fn from(date: Date) -> Self {
        date.to_string()
    }
}

/// Work shift of a schedule entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Shift {
    Morning,
    Afternoon,
    Night,
    Full,
}

impl Shift {
    pub const CONSTRAINT: &'static str = "Shifts should be one of: morning, afternoon, night, full";

    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Morning => "morning",
            Shift::Afternoon => "afternoon",
            Shift::Night => "night",
            Shift::Full => "full",
        }
    }

    pub fn is_valid(value: &str) -> bool {
        value.parse::<Shift>().is_ok()
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shift {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(Shift::Morning),
            "afternoon" => Ok(Shift::Afternoon),
            "night" => Ok(Shift::Night),
            "full" => Ok(Shift::Full),
            _ => Err(ValidationError::new("shift", s, Self::CONSTRAINT)),
        }
    }
}

impl TryFrom<String> for Shift {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Shift> for String {
    fn from(shift: Shift) -> Self {
        shift.as_str().to_string()
    }
}

/// Review state of an expense claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ClaimStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ClaimStatus {
    pub const CONSTRAINT: &'static str = "Claim status should be one of: pending, approved, rejected";

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        }
    }

    /// Returns true once the claim has been decided
    pub fn is_settled(&self) -> bool {
        !matches!(self, ClaimStatus::Pending)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ClaimStatus::Pending),
            "approved" => Ok(ClaimStatus::Approved),
            "rejected" => Ok(ClaimStatus::Rejected),
            _ => Err(ValidationError::new("claim status", s, Self::CONSTRAINT)),
        }
    }
}

impl TryFrom<String> for ClaimStatus {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClaimStatus> for String {
    fn from(status: ClaimStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Number of open positions on a posting (1-999)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vacancies(u16);

impl Vacancies {
    pub const CONSTRAINT: &'static str = "Vacancies should be a whole number from 1 to 999";

    pub fn new(value: &str) -> Result<Self, ValidationError> {
        match value.trim().parse::<u16>() {
            Ok(n) if (1..=999).contains(&n) => Ok(Self(n)),
            _ => Err(ValidationError::new("vacancies", value, Self::CONSTRAINT)),
        }
    }

    pub fn is_valid(value: &str) -> bool {
        Self::new(value).is_ok()
    }

    pub fn get(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Vacancies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Vacancies {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Vacancies {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Vacancies> for String {
    fn from(vacancies: Vacancies) -> Self {
        vacancies.to_string()
    }
}
