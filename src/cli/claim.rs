//! Expense claim CLI commands

use anyhow::Result;
use clap::{Args, Subcommand};

use super::output::Output;
use super::query::{parse_sort_keys, push_exact, push_words, ListOptions};
use super::session::Session;
use crate::domain::{
    ClaimField, ClaimSortKey, ClaimStatus, Date, Description, EmployeeId, ExpenseClaim, RecordKind,
};

/// Identifies one claim: who filed it, when, and for what
#[derive(Args, Debug)]
pub struct ClaimKey {
    /// Employee ID
    employee: String,

    /// Date of the expense (dd/mm/yyyy)
    date: String,

    /// Description of the expense
    description: String,
}

impl ClaimKey {
    fn parse(&self) -> Result<(EmployeeId, Date, Description)> {
        Ok((
            self.employee.parse()?,
            self.date.parse()?,
            self.description.parse()?,
        ))
    }
}

#[derive(Subcommand)]
pub enum ClaimCommands {
    /// File a new, pending expense claim
    ///
    /// Example:
    ///   staffbook claim add 000001 12/03/2024 18.50 "Taxi to client site"
    Add {
        /// Employee ID
        employee: String,

        /// Date of the expense (dd/mm/yyyy)
        date: String,

        /// Amount, up to two decimal places
        amount: String,

        /// Description of the expense
        description: String,
    },

    /// Change an existing claim
    Edit {
        #[command(flatten)]
        key: ClaimKey,

        #[command(flatten)]
        changes: ClaimChanges,
    },

    /// Delete a claim
    Delete {
        #[command(flatten)]
        key: ClaimKey,
    },

    /// Approve a claim
    Approve {
        #[command(flatten)]
        key: ClaimKey,
    },

    /// Reject a claim
    Reject {
        #[command(flatten)]
        key: ClaimKey,
    },

    /// List claims, optionally filtered and sorted
    List {
        #[command(flatten)]
        criteria: ClaimCriteria,

        #[command(flatten)]
        options: ListOptions,
    },

    /// Permanently reorder the stored claims (date, amount, id)
    Sort {
        #[arg(required = true, value_delimiter = ',')]
        keys: Vec<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ClaimChanges {
    #[arg(long = "new-date")]
    pub new_date: Option<String>,

    #[arg(long)]
    pub amount: Option<String>,

    #[arg(long = "new-description")]
    pub new_description: Option<String>,
}

impl ClaimChanges {
    fn is_empty(&self) -> bool {
        self.new_date.is_none() && self.amount.is_none() && self.new_description.is_none()
    }

    fn apply(&self, claim: &ExpenseClaim) -> Result<ExpenseClaim> {
        let mut edited = claim.clone();
        if let Some(date) = &self.new_date {
            edited.date = date.parse()?;
        }
        if let Some(amount) = &self.amount {
            edited.amount = amount.parse()?;
        }
        if let Some(description) = &self.new_description {
            edited.description = description.parse()?;
        }
        Ok(edited)
    }
}

#[derive(Args, Debug, Default)]
pub struct ClaimCriteria {
    /// Exact employee ID
    #[arg(long)]
    pub employee: Option<String>,

    /// Exact date (dd/mm/yyyy)
    #[arg(long)]
    pub date: Option<String>,

    /// pending, approved or rejected
    #[arg(long)]
    pub status: Option<String>,

    /// Words to look for in the description
    #[arg(long, num_args = 1..)]
    pub description: Vec<String>,
}

pub fn run(cmd: ClaimCommands, output: &Output) -> Result<()> {
    match cmd {
        ClaimCommands::Add {
            employee,
            date,
            amount,
            description,
        } => {
            let claim = ExpenseClaim::new(
                employee.parse()?,
                date.parse()?,
                amount.parse()?,
                description.parse()?,
            );
            add_claim(output, claim)
        }
        ClaimCommands::Edit { key, changes } => edit_claim(output, &key, &changes),
        ClaimCommands::Delete { key } => delete_claim(output, &key),
        ClaimCommands::Approve { key } => decide_claim(output, &key, ClaimStatus::Approved),
        ClaimCommands::Reject { key } => decide_claim(output, &key, ClaimStatus::Rejected),
        ClaimCommands::List { criteria, options } => list_claims(output, &criteria, &options),
        ClaimCommands::Sort { keys } => sort_claims(output, &keys),
    }
}

fn find_claim(session: &Session, key: &ClaimKey) -> Result<ExpenseClaim> {
    let (employee, date, description) = key.parse()?;
    session
        .book()
        .claims()
        .store()
        .find(|c| c.employee_id == employee && c.date == date && c.description == description)
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No expense claim found for employee {} on {} for '{}'",
                employee,
                date,
                description
            )
        })
}

fn add_claim(output: &Output, claim: ExpenseClaim) -> Result<()> {
    Session::run(output, |session| {
        session.book_mut().add_claim(claim.clone())?;

        if output.is_json() {
            output.data(&claim);
        } else {
            output.success(&format!("New expense claim added: {}", claim));
        }
        Ok(())
    })
}

fn edit_claim(output: &Output, key: &ClaimKey, changes: &ClaimChanges) -> Result<()> {
    if changes.is_empty() {
        anyhow::bail!("At least one field to edit must be provided");
    }

    Session::run(output, |session| {
        let current = find_claim(session, key)?;
        if current.status.is_settled() {
            anyhow::bail!("Cannot edit a claim that was already {}", current.status);
        }
        let edited = changes.apply(&current)?;
        session.book_mut().replace_claim(&current, edited.clone())?;

        if output.is_json() {
            output.data(&edited);
        } else {
            output.success(&format!("Edited expense claim: {}", edited));
        }
        Ok(())
    })
}

fn delete_claim(output: &Output, key: &ClaimKey) -> Result<()> {
    Session::run(output, |session| {
        let target = find_claim(session, key)?;
        let removed = session.book_mut().remove_claim(&target)?;

        if output.is_json() {
            output.data(&removed);
        } else {
            output.success(&format!("Deleted expense claim: {}", removed));
        }
        Ok(())
    })
}

fn decide_claim(output: &Output, key: &ClaimKey, status: ClaimStatus) -> Result<()> {
    Session::run(output, |session| {
        let target = find_claim(session, key)?;
        if target.status == status {
            anyhow::bail!("Expense claim is already {}", status);
        }
        let updated = session.book_mut().set_claim_status(&target, status)?;

        if output.is_json() {
            output.data(&updated);
        } else {
            output.success(&format!("Expense claim {}: {}", status, updated));
        }
        Ok(())
    })
}

fn list_claims(output: &Output, criteria: &ClaimCriteria, options: &ListOptions) -> Result<()> {
    let date = criteria.date.as_deref().map(str::parse::<Date>).transpose()?;
    let date = date.map(|d| d.to_string());
    let status = criteria
        .status
        .as_deref()
        .map(str::parse::<ClaimStatus>)
        .transpose()?;

    let mut parts = Vec::new();
    push_exact(&mut parts, ClaimField::EmployeeId, criteria.employee.as_deref());
    push_exact(&mut parts, ClaimField::Date, date.as_deref());
    push_exact(&mut parts, ClaimField::Status, status.as_ref().map(ClaimStatus::as_str));
    push_words(&mut parts, ClaimField::Description, &criteria.description);
    let predicate = options.predicate(parts);
    let order = options.order::<ClaimSortKey>()?;

    Session::run(output, |session| {
        let claims = session
            .book_mut()
            .claims_mut()
            .view_with(Some(predicate), order);
        output.records(RecordKind::ExpenseClaim, &claims);
        Ok(())
    })
}

fn sort_claims(output: &Output, keys: &[String]) -> Result<()> {
    let order = parse_sort_keys::<ClaimSortKey>(keys)?;

    Session::run(output, |session| {
        session
            .book_mut()
            .claims_mut()
            .store_mut()
            .sort_by_order(&order);
        output.success(&format!("Sorted expense claims by {}", keys.join(", ")));
        Ok(())
    })
}
