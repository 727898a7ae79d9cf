//! Employee CLI commands

use anyhow::Result;
use clap::{Args, Subcommand};

use super::output::Output;
use super::query::{parse_sort_keys, push_exact, push_words, ListOptions};
use super::session::Session;
use crate::domain::{Employee, EmployeeField, EmployeeId, EmployeeSortKey, RecordKind, Tag};

#[derive(Subcommand)]
pub enum EmployeeCommands {
    /// Add an employee
    ///
    /// Example:
    ///   staffbook employee add --id 000007 --name "Alex Yeoh" --phone 87438807 \
    ///     --email alexyeoh@example.com --department Engineering \
    ///     --position "Software Engineer" --salary 5200 --tag remote
    Add {
        #[arg(long)]
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        department: String,

        /// Job title
        #[arg(long)]
        position: String,

        /// Monthly salary, up to two decimal places
        #[arg(long)]
        salary: String,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Edit an employee; changing the id moves their schedules and claims
    Edit {
        /// Employee to edit
        id: String,

        #[command(flatten)]
        changes: EmployeeChanges,
    },

    /// Delete an employee together with their schedules and claims
    Delete {
        /// Employee ID
        id: String,
    },

    /// List employees, optionally filtered and sorted
    List {
        #[command(flatten)]
        criteria: EmployeeCriteria,

        #[command(flatten)]
        options: ListOptions,
    },

    /// Permanently reorder the stored employees (id, name, department, salary)
    Sort {
        #[arg(required = true, value_delimiter = ',')]
        keys: Vec<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct EmployeeChanges {
    /// New employee ID
    #[arg(long = "new-id")]
    pub new_id: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub department: Option<String>,

    #[arg(long)]
    pub position: Option<String>,

    #[arg(long)]
    pub salary: Option<String>,

    /// Replace the tags (repeatable)
    #[arg(long = "tag", conflicts_with = "clear_tags")]
    pub tags: Vec<String>,

    /// Remove every tag
    #[arg(long)]
    pub clear_tags: bool,
}

impl EmployeeChanges {
    fn is_empty(&self) -> bool {
        self.new_id.is_none()
            && self.name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.department.is_none()
            && self.position.is_none()
            && self.salary.is_none()
            && self.tags.is_empty()
            && !self.clear_tags
    }

    /// Returns a copy of `employee` with these changes applied
    fn apply(&self, employee: &Employee) -> Result<Employee> {
        let mut edited = employee.clone();
        if let Some(id) = &self.new_id {
            edited.id = id.parse()?;
        }
        if let Some(name) = &self.name {
            edited.name = name.parse()?;
        }
        if let Some(phone) = &self.phone {
            edited.phone = phone.parse()?;
        }
        if let Some(email) = &self.email {
            edited.email = email.parse()?;
        }
        if let Some(department) = &self.department {
            edited.department = department.parse()?;
        }
        if let Some(position) = &self.position {
            edited.position = position.parse()?;
        }
        if let Some(salary) = &self.salary {
            edited.salary = salary.parse()?;
        }
        if self.clear_tags {
            edited.tags.clear();
        } else if !self.tags.is_empty() {
            edited = edited.with_tags(parse_tags(&self.tags)?);
        }
        Ok(edited)
    }
}

#[derive(Args, Debug, Default)]
pub struct EmployeeCriteria {
    /// Exact employee ID
    #[arg(long)]
    pub id: Option<String>,

    /// Words to look for in the name
    #[arg(long, num_args = 1..)]
    pub name: Vec<String>,

    /// Exact email address
    #[arg(long)]
    pub email: Option<String>,

    /// Words to look for in the department
    #[arg(long, num_args = 1..)]
    pub department: Vec<String>,

    /// Words to look for in the position
    #[arg(long, num_args = 1..)]
    pub position: Vec<String>,

    /// Tags to look for
    #[arg(long = "tag", num_args = 1..)]
    pub tags: Vec<String>,
}

pub fn run(cmd: EmployeeCommands, output: &Output) -> Result<()> {
    match cmd {
        EmployeeCommands::Add {
            id,
            name,
            phone,
            email,
            department,
            position,
            salary,
            tags,
        } => {
            let employee = Employee::new(
                id.parse()?,
                name.parse()?,
                phone.parse()?,
                email.parse()?,
                department.parse()?,
                position.parse()?,
                salary.parse()?,
            )
            .with_tags(parse_tags(&tags)?);
            add_employee(output, employee)
        }
        EmployeeCommands::Edit { id, changes } => edit_employee(output, &id.parse()?, &changes),
        EmployeeCommands::Delete { id } => delete_employee(output, &id.parse()?),
        EmployeeCommands::List { criteria, options } => list_employees(output, &criteria, &options),
        EmployeeCommands::Sort { keys } => sort_employees(output, &keys),
    }
}

fn parse_tags(tags: &[String]) -> Result<Vec<Tag>> {
    Ok(tags.iter().map(|t| t.parse()).collect::<Result<Vec<Tag>, _>>()?)
}

fn add_employee(output: &Output, employee: Employee) -> Result<()> {
    Session::run(output, |session| {
        session.book_mut().add_employee(employee.clone())?;

        if output.is_json() {
            output.data(&employee);
        } else {
            output.success(&format!("New employee added: {}", employee));
        }
        Ok(())
    })
}

fn edit_employee(output: &Output, id: &EmployeeId, changes: &EmployeeChanges) -> Result<()> {
    if changes.is_empty() {
        anyhow::bail!("At least one field to edit must be provided");
    }

    Session::run(output, |session| {
        let book = session.book_mut();
        let current = book
            .employee(id)
            .ok_or_else(|| anyhow::anyhow!("No employee with id {} exists", id))?
            .clone();
        let edited = changes.apply(&current)?;

        if edited == current {
            anyhow::bail!("Nothing changed for employee {}", id);
        }

        book.edit_employee(id, edited.clone())?;
        output.verbose_ctx("employee", &format!("Was: {}", current));

        if output.is_json() {
            output.data(&edited);
        } else {
            output.success(&format!("Edited employee: {}", edited));
            if edited.id != current.id {
                let schedules = book.schedules_of(&edited.id).len();
                let claims = book.claims_of(&edited.id).len();
                if schedules + claims > 0 {
                    println!(
                        "Moved {} schedule(s) and {} claim(s) from {} to {}",
                        schedules, claims, current.id, edited.id
                    );
                }
            }
        }
        Ok(())
    })
}

fn delete_employee(output: &Output, id: &EmployeeId) -> Result<()> {
    Session::run(output, |session| {
        let removed = session.book_mut().remove_employee(id)?;

        if output.is_json() {
            output.data(&serde_json::json!({
                "deleted": removed.employee,
                "schedules_removed": removed.schedules,
                "claims_removed": removed.claims,
            }));
        } else {
            output.success(&format!("Deleted employee: {}", removed.employee));
            if removed.schedules + removed.claims > 0 {
                println!(
                    "Also removed {} schedule(s) and {} claim(s)",
                    removed.schedules, removed.claims
                );
            }
        }
        Ok(())
    })
}

fn list_employees(output: &Output, criteria: &EmployeeCriteria, options: &ListOptions) -> Result<()> {
    let mut parts = Vec::new();
    push_exact(&mut parts, EmployeeField::Id, criteria.id.as_deref());
    push_words(&mut parts, EmployeeField::Name, &criteria.name);
    push_exact(&mut parts, EmployeeField::Email, criteria.email.as_deref());
    push_words(&mut parts, EmployeeField::Department, &criteria.department);
    push_words(&mut parts, EmployeeField::Position, &criteria.position);
    push_words(&mut parts, EmployeeField::Tags, &criteria.tags);
    let predicate = options.predicate(parts);
    let order = options.order::<EmployeeSortKey>()?;

    Session::run(output, |session| {
        output.verbose_ctx("employee", &format!("Filter: {:?}", predicate));
        let employees = session
            .book_mut()
            .employees_mut()
            .view_with(Some(predicate), order);
        output.records(RecordKind::Employee, &employees);
        Ok(())
    })
}

fn sort_employees(output: &Output, keys: &[String]) -> Result<()> {
    let order = parse_sort_keys::<EmployeeSortKey>(keys)?;

    Session::run(output, |session| {
        session
            .book_mut()
            .employees_mut()
            .store_mut()
            .sort_by_order(&order);
        output.success(&format!("Sorted employees by {}", keys.join(", ")));
        Ok(())
    })
}
