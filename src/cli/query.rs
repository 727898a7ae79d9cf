//! Shared filter and sort plumbing, plus the status overview

use std::str::FromStr;

use anyhow::Result;
use chrono::{Local, Timelike};
use clap::Args;

use super::output::Output;
use super::session::Session;
use crate::domain::{RecordKind, ValidationError};
use crate::model::{Predicate, SortOrder};

/// Options every `list` command accepts
#[derive(Args, Debug, Default)]
pub struct ListOptions {
    /// Show records matching any criterion instead of all of them
    #[arg(long)]
    pub any: bool,

    /// Show records that do NOT match the criteria
    #[arg(long)]
    pub exclude: bool,

    /// Sort the listing by these keys (comma separated, first key wins)
    #[arg(long, value_delimiter = ',')]
    pub sort: Vec<String>,
}

impl ListOptions {
    /// Joins per-field criteria into one predicate
    pub fn predicate<F: Copy>(&self, parts: Vec<Predicate<F>>) -> Predicate<F> {
        let combined = if self.any {
            parts.into_iter().reduce(Predicate::or).unwrap_or_default()
        } else {
            parts.into_iter().fold(Predicate::Always, Predicate::and)
        };

        if self.exclude && !combined.is_always() {
            combined.negate()
        } else {
            combined
        }
    }

    /// Parses `--sort`; `None` keeps the store order
    pub fn order<K>(&self) -> Result<Option<SortOrder<K>>>
    where
        K: FromStr<Err = ValidationError> + Copy,
    {
        if self.sort.is_empty() {
            return Ok(None);
        }
        Ok(Some(parse_sort_keys(&self.sort)?))
    }
}

/// Parses a chain of sort keys
pub fn parse_sort_keys<K>(keys: &[String]) -> Result<SortOrder<K>>
where
    K: FromStr<Err = ValidationError> + Copy,
{
    let order = keys
        .iter()
        .map(|key| key.parse::<K>())
        .collect::<Result<SortOrder<K>, _>>()?;
    Ok(order)
}

/// Adds an any-word criterion when keywords were given
pub fn push_words<F: Copy>(parts: &mut Vec<Predicate<F>>, field: F, words: &[String]) {
    if !words.is_empty() {
        parts.push(Predicate::any_word(field, words));
    }
}

/// Adds an exact criterion when a value was given
pub fn push_exact<F: Copy>(parts: &mut Vec<Predicate<F>>, field: F, value: Option<&str>) {
    if let Some(value) = value {
        parts.push(Predicate::exact(field, value));
    }
}

/// Time-of-day greeting
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning!",
        12..=17 => "Good afternoon!",
        18..=21 => "Good evening!",
        _ => "Hello, night owl!",
    }
}

/// Shows project status overview
pub fn status(output: &Output) -> Result<()> {
    Session::run(output, |session| {
        let book = session.book();
        let project = session.project();
        let kinds = [
            RecordKind::Employee,
            RecordKind::Schedule,
            RecordKind::ExpenseClaim,
            RecordKind::RecruitmentPosting,
        ];
        let pending = book
            .claims()
            .store()
            .iter()
            .filter(|c| !c.status.is_settled())
            .count();

        if output.is_json() {
            let counts: serde_json::Map<String, serde_json::Value> = kinds
                .iter()
                .map(|k| (k.plural().replace(' ', "_"), book.count(*k).into()))
                .collect();
            output.data(&serde_json::json!({
                "root": project.root().display().to_string(),
                "data_file": project.snapshot_file().path().display().to_string(),
                "source": session.source().to_string(),
                "counts": counts,
                "pending_claims": pending,
            }));
            return Ok(());
        }

        if project.config().global.greeting {
            println!("{}", greeting(Local::now().hour()));
            output.blank();
        }
        println!("Project: {}", project.root().display());
        println!("Data file: {} ({})", project.snapshot_file().path().display(), session.source());
        output.blank();
        for kind in kinds {
            println!("  {:<22} {}", kind.plural(), book.count(kind));
        }
        if pending > 0 {
            output.blank();
            println!("{} expense claim(s) awaiting a decision", pending);
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmployeeField, EmployeeSortKey};

    #[test]
    fn greeting_follows_the_clock() {
        assert_eq!(greeting(7), "Good morning!");
        assert_eq!(greeting(12), "Good afternoon!");
        assert_eq!(greeting(20), "Good evening!");
        assert_eq!(greeting(2), "Hello, night owl!");
        assert_eq!(greeting(23), "Hello, night owl!");
    }

    #[test]
    fn no_criteria_matches_everything() {
        let options = ListOptions {
            exclude: true,
            ..ListOptions::default()
        };
        assert!(options.predicate::<EmployeeField>(vec![]).is_always());
    }

    #[test]
    fn criteria_join_with_and_by_default() {
        let options = ListOptions::default();
        let mut parts = Vec::new();
        push_words(&mut parts, EmployeeField::Name, &["alex".to_string()]);
        push_exact(&mut parts, EmployeeField::Id, Some("000001"));

        assert!(matches!(options.predicate(parts), Predicate::All(p) if p.len() == 2));
    }

    #[test]
    fn any_joins_with_or_and_exclude_negates() {
        let options = ListOptions {
            any: true,
            exclude: true,
            ..ListOptions::default()
        };
        let mut parts = Vec::new();
        push_words(&mut parts, EmployeeField::Name, &["alex".to_string()]);
        push_words(&mut parts, EmployeeField::Tags, &["lead".to_string()]);

        assert!(matches!(options.predicate(parts), Predicate::Not(inner) if matches!(*inner, Predicate::Any(_))));
    }

    #[test]
    fn sort_keys_parse_in_order() {
        let order: SortOrder<EmployeeSortKey> =
            parse_sort_keys(&["department".to_string(), "id".to_string()]).unwrap();
        assert_eq!(order.keys(), &[EmployeeSortKey::Department, EmployeeSortKey::Id]);

        assert!(parse_sort_keys::<EmployeeSortKey>(&["height".to_string()]).is_err());
    }
}
