//! Recruitment posting CLI commands

use anyhow::Result;
use clap::{Args, Subcommand};

use super::output::Output;
use super::query::{parse_sort_keys, push_words, ListOptions};
use super::session::Session;
use crate::domain::{
    Department, JobTitle, PostingField, PostingSortKey, RecordKind, RecruitmentPosting,
};

#[derive(Subcommand)]
pub enum PostingCommands {
    /// Open a recruitment posting
    ///
    /// Example:
    ///   staffbook posting add --title "Data Analyst" --department Finance \
    ///     --salary 4800 --vacancies 2 --requirements "Degree in statistics"
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        department: String,

        /// Offered monthly salary
        #[arg(long)]
        salary: String,

        /// Number of open positions (1-999)
        #[arg(long)]
        vacancies: String,

        #[arg(long)]
        requirements: String,
    },

    /// Change an existing posting
    Edit {
        /// Job title of the posting
        title: String,

        /// Department of the posting
        department: String,

        #[command(flatten)]
        changes: PostingChanges,
    },

    /// Close (delete) a posting
    Delete {
        /// Job title of the posting
        title: String,

        /// Department of the posting
        department: String,
    },

    /// List postings, optionally filtered and sorted
    List {
        #[command(flatten)]
        criteria: PostingCriteria,

        #[command(flatten)]
        options: ListOptions,
    },

    /// Permanently reorder the stored postings (title, department, salary, vacancies)
    Sort {
        #[arg(required = true, value_delimiter = ',')]
        keys: Vec<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct PostingChanges {
    #[arg(long = "new-title")]
    pub new_title: Option<String>,

    #[arg(long = "new-department")]
    pub new_department: Option<String>,

    #[arg(long)]
    pub salary: Option<String>,

    #[arg(long)]
    pub vacancies: Option<String>,

    #[arg(long)]
    pub requirements: Option<String>,
}

impl PostingChanges {
    fn is_empty(&self) -> bool {
        self.new_title.is_none()
            && self.new_department.is_none()
            && self.salary.is_none()
            && self.vacancies.is_none()
            && self.requirements.is_none()
    }

    fn apply(&self, posting: &RecruitmentPosting) -> Result<RecruitmentPosting> {
        let mut edited = posting.clone();
        if let Some(title) = &self.new_title {
            edited.job_title = title.parse()?;
        }
        if let Some(department) = &self.new_department {
            edited.department = department.parse()?;
        }
        if let Some(salary) = &self.salary {
            edited.salary = salary.parse()?;
        }
        if let Some(vacancies) = &self.vacancies {
            edited.vacancies = vacancies.parse()?;
        }
        if let Some(requirements) = &self.requirements {
            edited.requirements = requirements.parse()?;
        }
        Ok(edited)
    }
}

#[derive(Args, Debug, Default)]
pub struct PostingCriteria {
    /// Words to look for in the job title
    #[arg(long, num_args = 1..)]
    pub title: Vec<String>,

    /// Words to look for in the department
    #[arg(long, num_args = 1..)]
    pub department: Vec<String>,

    /// Words to look for in the requirements
    #[arg(long, num_args = 1..)]
    pub requirements: Vec<String>,
}

pub fn run(cmd: PostingCommands, output: &Output) -> Result<()> {
    match cmd {
        PostingCommands::Add {
            title,
            department,
            salary,
            vacancies,
            requirements,
        } => {
            let posting = RecruitmentPosting::new(
                title.parse()?,
                department.parse()?,
                salary.parse()?,
                vacancies.parse()?,
                requirements.parse()?,
            );
            add_posting(output, posting)
        }
        PostingCommands::Edit {
            title,
            department,
            changes,
        } => edit_posting(output, &title.parse()?, &department.parse()?, &changes),
        PostingCommands::Delete { title, department } => {
            delete_posting(output, &title.parse()?, &department.parse()?)
        }
        PostingCommands::List { criteria, options } => list_postings(output, &criteria, &options),
        PostingCommands::Sort { keys } => sort_postings(output, &keys),
    }
}

fn find_posting(session: &Session, title: &JobTitle, department: &Department) -> Result<RecruitmentPosting> {
    session
        .book()
        .postings()
        .store()
        .find(|p| &p.job_title == title && &p.department == department)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("No recruitment posting found for {} in {}", title, department))
}

fn add_posting(output: &Output, posting: RecruitmentPosting) -> Result<()> {
    Session::run(output, |session| {
        session.book_mut().add_posting(posting.clone())?;

        if output.is_json() {
            output.data(&posting);
        } else {
            output.success(&format!("New recruitment posting added: {}", posting));
        }
        Ok(())
    })
}

fn edit_posting(
    output: &Output,
    title: &JobTitle,
    department: &Department,
    changes: &PostingChanges,
) -> Result<()> {
    if changes.is_empty() {
        anyhow::bail!("At least one field to edit must be provided");
    }

    Session::run(output, |session| {
        let current = find_posting(session, title, department)?;
        let edited = changes.apply(&current)?;
        session.book_mut().replace_posting(&current, edited.clone())?;

        if output.is_json() {
            output.data(&edited);
        } else {
            output.success(&format!("Edited recruitment posting: {}", edited));
        }
        Ok(())
    })
}

fn delete_posting(output: &Output, title: &JobTitle, department: &Department) -> Result<()> {
    Session::run(output, |session| {
        let target = find_posting(session, title, department)?;
        let removed = session.book_mut().remove_posting(&target)?;

        if output.is_json() {
            output.data(&removed);
        } else {
            output.success(&format!("Deleted recruitment posting: {}", removed));
        }
        Ok(())
    })
}

fn list_postings(output: &Output, criteria: &PostingCriteria, options: &ListOptions) -> Result<()> {
    let mut parts = Vec::new();
    push_words(&mut parts, PostingField::JobTitle, &criteria.title);
    push_words(&mut parts, PostingField::Department, &criteria.department);
    push_words(&mut parts, PostingField::Requirements, &criteria.requirements);
    let predicate = options.predicate(parts);
    let order = options.order::<PostingSortKey>()?;

    Session::run(output, |session| {
        let postings = session
            .book_mut()
            .postings_mut()
            .view_with(Some(predicate), order);
        output.records(RecordKind::RecruitmentPosting, &postings);
        Ok(())
    })
}

fn sort_postings(output: &Output, keys: &[String]) -> Result<()> {
    let order = parse_sort_keys::<PostingSortKey>(keys)?;

    Session::run(output, |session| {
        session
            .book_mut()
            .postings_mut()
            .store_mut()
            .sort_by_order(&order);
        output.success(&format!("Sorted recruitment postings by {}", keys.join(", ")));
        Ok(())
    })
}
