//! Schedule CLI commands

use anyhow::Result;
use clap::{Args, Subcommand};

use super::output::Output;
use super::query::{parse_sort_keys, push_exact, push_words, ListOptions};
use super::session::Session;
use crate::domain::{Date, EmployeeId, RecordKind, Schedule, ScheduleField, ScheduleSortKey};

#[derive(Subcommand)]
pub enum ScheduleCommands {
    /// Schedule an employee for a date
    ///
    /// Example:
    ///   staffbook schedule add 000001 04/04/2019 morning --remark "Client visit"
    Add {
        /// Employee ID
        employee: String,

        /// Date (dd/mm/yyyy)
        date: String,

        /// morning, afternoon, night or full
        shift: String,

        #[arg(long)]
        remark: Option<String>,
    },

    /// Change an existing schedule entry
    Edit {
        /// Employee ID
        employee: String,

        /// Date of the entry (dd/mm/yyyy)
        date: String,

        #[command(flatten)]
        changes: ScheduleChanges,
    },

    /// Delete a schedule entry
    Delete {
        /// Employee ID
        employee: String,

        /// Date (dd/mm/yyyy)
        date: String,
    },

    /// List schedule entries, optionally filtered and sorted
    List {
        #[command(flatten)]
        criteria: ScheduleCriteria,

        #[command(flatten)]
        options: ListOptions,
    },

    /// Permanently reorder the stored schedule (date, id, shift)
    Sort {
        #[arg(required = true, value_delimiter = ',')]
        keys: Vec<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ScheduleChanges {
    /// Move the entry to another employee
    #[arg(long = "new-employee")]
    pub new_employee: Option<String>,

    /// Move the entry to another date
    #[arg(long = "new-date")]
    pub new_date: Option<String>,

    #[arg(long)]
    pub shift: Option<String>,

    #[arg(long, conflicts_with = "clear_remark")]
    pub remark: Option<String>,

    #[arg(long)]
    pub clear_remark: bool,
}

impl ScheduleChanges {
    fn is_empty(&self) -> bool {
        self.new_employee.is_none()
            && self.new_date.is_none()
            && self.shift.is_none()
            && self.remark.is_none()
            && !self.clear_remark
    }

    fn apply(&self, schedule: &Schedule) -> Result<Schedule> {
        let mut edited = schedule.clone();
        if let Some(employee) = &self.new_employee {
            edited.employee_id = employee.parse()?;
        }
        if let Some(date) = &self.new_date {
            edited.date = date.parse()?;
        }
        if let Some(shift) = &self.shift {
            edited.shift = shift.parse()?;
        }
        if self.clear_remark {
            edited.remark = None;
        } else if let Some(remark) = &self.remark {
            edited.remark = Some(remark.parse()?);
        }
        Ok(edited)
    }
}

#[derive(Args, Debug, Default)]
pub struct ScheduleCriteria {
    /// Exact employee ID
    #[arg(long)]
    pub employee: Option<String>,

    /// Exact date (dd/mm/yyyy)
    #[arg(long)]
    pub date: Option<String>,

    /// Exact shift
    #[arg(long)]
    pub shift: Option<String>,

    /// Words to look for in the remark
    #[arg(long, num_args = 1..)]
    pub remark: Vec<String>,
}

pub fn run(cmd: ScheduleCommands, output: &Output) -> Result<()> {
    match cmd {
        ScheduleCommands::Add {
            employee,
            date,
            shift,
            remark,
        } => {
            let mut schedule = Schedule::new(employee.parse()?, date.parse()?, shift.parse()?);
            if let Some(remark) = remark {
                schedule = schedule.with_remark(remark.parse()?);
            }
            add_schedule(output, schedule)
        }
        ScheduleCommands::Edit {
            employee,
            date,
            changes,
        } => edit_schedule(output, &employee.parse()?, &date.parse()?, &changes),
        ScheduleCommands::Delete { employee, date } => {
            delete_schedule(output, &employee.parse()?, &date.parse()?)
        }
        ScheduleCommands::List { criteria, options } => list_schedules(output, &criteria, &options),
        ScheduleCommands::Sort { keys } => sort_schedules(output, &keys),
    }
}

fn add_schedule(output: &Output, schedule: Schedule) -> Result<()> {
    Session::run(output, |session| {
        session.book_mut().add_schedule(schedule.clone())?;

        if output.is_json() {
            output.data(&schedule);
        } else {
            output.success(&format!("New schedule added: {}", schedule));
        }
        Ok(())
    })
}

fn find_schedule(session: &Session, employee: &EmployeeId, date: &Date) -> Result<Schedule> {
    session
        .book()
        .schedule(employee, date)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("No schedule found for employee {} on {}", employee, date))
}

fn edit_schedule(output: &Output, employee: &EmployeeId, date: &Date, changes: &ScheduleChanges) -> Result<()> {
    if changes.is_empty() {
        anyhow::bail!("At least one field to edit must be provided");
    }

    Session::run(output, |session| {
        let current = find_schedule(session, employee, date)?;
        let edited = changes.apply(&current)?;
        session.book_mut().replace_schedule(&current, edited.clone())?;

        if output.is_json() {
            output.data(&edited);
        } else {
            output.success(&format!("Edited schedule: {}", edited));
        }
        Ok(())
    })
}

fn delete_schedule(output: &Output, employee: &EmployeeId, date: &Date) -> Result<()> {
    Session::run(output, |session| {
        let target = find_schedule(session, employee, date)?;
        let removed = session.book_mut().remove_schedule(&target)?;

        if output.is_json() {
            output.data(&removed);
        } else {
            output.success(&format!("Deleted schedule: {}", removed));
        }
        Ok(())
    })
}

fn list_schedules(output: &Output, criteria: &ScheduleCriteria, options: &ListOptions) -> Result<()> {
    // A malformed date is an error, not an empty listing
    let date = criteria.date.as_deref().map(str::parse::<Date>).transpose()?;
    let date = date.map(|d| d.to_string());

    let mut parts = Vec::new();
    push_exact(&mut parts, ScheduleField::EmployeeId, criteria.employee.as_deref());
    push_exact(&mut parts, ScheduleField::Date, date.as_deref());
    push_exact(&mut parts, ScheduleField::Shift, criteria.shift.as_deref());
    push_words(&mut parts, ScheduleField::Remark, &criteria.remark);
    let predicate = options.predicate(parts);
    let order = options.order::<ScheduleSortKey>()?;

    Session::run(output, |session| {
        let schedules = session
            .book_mut()
            .schedules_mut()
            .view_with(Some(predicate), order);
        output.records(RecordKind::Schedule, &schedules);
        Ok(())
    })
}

fn sort_schedules(output: &Output, keys: &[String]) -> Result<()> {
    let order = parse_sort_keys::<ScheduleSortKey>(keys)?;

    Session::run(output, |session| {
        session
            .book_mut()
            .schedules_mut()
            .store_mut()
            .sort_by_order(&order);
        output.success(&format!("Sorted schedule by {}", keys.join(", ")));
        Ok(())
    })
}
