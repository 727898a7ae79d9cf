//! Predicates and comparators for record views
//!
//! A [`Predicate`] is a tree of per-field keyword checks over any
//! [`Searchable`] record. Two keyword strategies exist:
//!
//! | Strategy | Matches when | Typical fields |
//! |----------|--------------|----------------|
//! | [`KeywordMatch::Exact`] | whole field equals the keyword, ignoring case | id, date, email, status |
//! | [`KeywordMatch::AnyWord`] | any keyword equals any whole word of the field, ignoring case | name, department, position |
//!
//! `AnyWord` never matches part of a word: `Yeo` does not match `Alex Yeoh`.
//!
//! A [`SortOrder`] is a chain of sort keys compared in turn.

use std::cmp::Ordering;

use crate::domain::{Searchable, Sortable};

/// How a field is compared against user keywords
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordMatch {
    /// Single keyword, equal to the whole field ignoring case
    Exact(String),
    /// Any keyword equal to any whitespace-separated word of the field
    AnyWord(Vec<String>),
}

impl KeywordMatch {
    pub fn exact(keyword: impl AsRef<str>) -> Self {
        KeywordMatch::Exact(keyword.as_ref().trim().to_lowercase())
    }

    /// Builds an any-word match; keywords containing spaces are split into words
    pub fn any_word<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = keywords
            .into_iter()
            .flat_map(|k| {
                k.as_ref()
                    .split_whitespace()
                    .map(str::to_lowercase)
                    .collect::<Vec<_>>()
            })
            .collect();
        KeywordMatch::AnyWord(words)
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            KeywordMatch::Exact(keyword) => text.trim().to_lowercase() == *keyword,
            KeywordMatch::AnyWord(keywords) => {
                if keywords.is_empty() {
                    return false;
                }
                let text = text.to_lowercase();
                text.split_whitespace()
                    .any(|word| keywords.iter().any(|k| k == word))
            }
        }
    }
}

/// Boolean filter over one record
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate<F> {
    /// Matches every record; the reset state
    Always,
    Field {
        field: F,
        matcher: KeywordMatch,
    },
    All(Vec<Predicate<F>>),
    Any(Vec<Predicate<F>>),
    Not(Box<Predicate<F>>),
}

impl<F> Default for Predicate<F> {
    fn default() -> Self {
        Predicate::Always
    }
}

impl<F: Copy> Predicate<F> {
    pub fn always() -> Self {
        Predicate::Always
    }

    pub fn field(field: F, matcher: KeywordMatch) -> Self {
        Predicate::Field { field, matcher }
    }

    pub fn exact(field: F, keyword: impl AsRef<str>) -> Self {
        Self::field(field, KeywordMatch::exact(keyword))
    }

    pub fn any_word<I, S>(field: F, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::field(field, KeywordMatch::any_word(keywords))
    }

    /// Both must match; `Always` is dropped from the result
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Predicate::Always, p) | (p, Predicate::Always) => p,
            (Predicate::All(mut left), Predicate::All(right)) => {
                left.extend(right);
                Predicate::All(left)
            }
            (Predicate::All(mut left), p) => {
                left.push(p);
                Predicate::All(left)
            }
            (p, q) => Predicate::All(vec![p, q]),
        }
    }

    /// Either may match
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Predicate::Always, _) | (_, Predicate::Always) => Predicate::Always,
            (Predicate::Any(mut left), p) => {
                left.push(p);
                Predicate::Any(left)
            }
            (p, q) => Predicate::Any(vec![p, q]),
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Predicate::Not(inner) => *inner,
            p => Predicate::Not(Box::new(p)),
        }
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Predicate::Always)
    }

    pub fn test<T>(&self, record: &T) -> bool
    where
        T: Searchable<Field = F>,
    {
        match self {
            Predicate::Always => true,
            Predicate::Field { field, matcher } => matcher.matches(&record.field_text(*field)),
            Predicate::All(parts) => parts.iter().all(|p| p.test(record)),
            Predicate::Any(parts) => parts.iter().any(|p| p.test(record)),
            Predicate::Not(inner) => !inner.test(record),
        }
    }
}

/// Chain of sort keys; an empty chain keeps the current order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder<K> {
    keys: Vec<K>,
}

impl<K> Default for SortOrder<K> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<K: Copy> SortOrder<K> {
    /// Keeps the store's order
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(key: K) -> Self {
        Self { keys: vec![key] }
    }

    /// Adds a tie-breaking key
    pub fn then(mut self, key: K) -> Self {
        self.keys.push(key);
        self
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn is_unsorted(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn compare<T>(&self, a: &T, b: &T) -> Ordering
    where
        T: Sortable<Key = K>,
    {
        self.keys
            .iter()
            .fold(Ordering::Equal, |acc, key| acc.then_with(|| a.compare_by(b, *key)))
    }
}

impl<K: Copy> FromIterator<K> for SortOrder<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Employee, EmployeeField, EmployeeSortKey, Schedule, ScheduleSortKey, Shift};

    fn employee(id: &str, name: &str, department: &str) -> Employee {
        Employee::new(
            id.parse().unwrap(),
            name.parse().unwrap(),
            "93210283".parse().unwrap(),
            "person@example.com".parse().unwrap(),
            department.parse().unwrap(),
            "Analyst".parse().unwrap(),
            "3000".parse().unwrap(),
        )
    }

    #[test]
    fn any_word_matches_whole_words_ignoring_case() {
        let alex = employee("000001", "Alex Yeoh", "Engineering");

        assert!(Predicate::any_word(EmployeeField::Name, ["Yeoh"]).test(&alex));
        assert!(Predicate::any_word(EmployeeField::Name, ["alex"]).test(&alex));
        assert!(!Predicate::any_word(EmployeeField::Name, ["Yeo"]).test(&alex));
    }

    #[test]
    fn any_word_needs_only_one_keyword() {
        let alex = employee("000001", "Alex Yeoh", "Engineering");
        let predicate = Predicate::any_word(EmployeeField::Name, ["Bernice", "yeoh"]);
        assert!(predicate.test(&alex));
    }

    #[test]
    fn any_word_without_keywords_matches_nothing() {
        let alex = employee("000001", "Alex Yeoh", "Engineering");
        let none: [&str; 0] = [];
        assert!(!Predicate::any_word(EmployeeField::Name, none).test(&alex));
    }

    #[test]
    fn any_word_splits_multi_word_keywords() {
        assert_eq!(
            KeywordMatch::any_word(["Alex  Yeoh"]),
            KeywordMatch::AnyWord(vec!["alex".into(), "yeoh".into()])
        );
    }

    #[test]
    fn exact_matches_whole_field_only() {
        let alex = employee("000001", "Alex Yeoh", "Engineering");

        assert!(Predicate::exact(EmployeeField::Id, "000001").test(&alex));
        assert!(!Predicate::exact(EmployeeField::Id, "1").test(&alex));
        assert!(Predicate::exact(EmployeeField::Email, "PERSON@example.com").test(&alex));
        assert!(!Predicate::exact(EmployeeField::Name, "Alex").test(&alex));
    }

    #[test]
    fn always_is_default_and_matches_everything() {
        let alex = employee("000001", "Alex Yeoh", "Engineering");
        let predicate: Predicate<EmployeeField> = Predicate::default();
        assert!(predicate.is_always());
        assert!(predicate.test(&alex));
    }

    #[test]
    fn composition_across_fields() {
        let alex = employee("000001", "Alex Yeoh", "Engineering");
        let bernice = employee("000002", "Bernice Yu", "Marketing");

        let engineers_named_alex = Predicate::any_word(EmployeeField::Name, ["alex", "bernice"])
            .and(Predicate::any_word(EmployeeField::Department, ["engineering"]));
        assert!(engineers_named_alex.test(&alex));
        assert!(!engineers_named_alex.test(&bernice));

        let either = Predicate::exact(EmployeeField::Id, "000001")
            .or(Predicate::exact(EmployeeField::Id, "000002"));
        assert!(either.test(&alex) && either.test(&bernice));

        let not_marketing = Predicate::any_word(EmployeeField::Department, ["marketing"]).negate();
        assert!(not_marketing.test(&alex));
        assert!(!not_marketing.test(&bernice));
    }

    #[test]
    fn and_with_always_is_identity() {
        let p = Predicate::exact(EmployeeField::Id, "000001");
        assert_eq!(Predicate::Always.and(p.clone()), p);
        assert_eq!(p.clone().and(Predicate::Always), p);
    }

    #[test]
    fn sort_order_chains_keys() {
        let mk = |id: &str, date: &str| {
            Schedule::new(id.parse().unwrap(), date.parse().unwrap(), Shift::Night)
        };
        let mut entries = vec![
            mk("000010", "04/04/2019"),
            mk("000002", "04/04/2019"),
            mk("000003", "01/01/2019"),
        ];
        let order = SortOrder::by(ScheduleSortKey::Date).then(ScheduleSortKey::EmployeeId);
        entries.sort_by(|a, b| order.compare(a, b));

        let ids: Vec<_> = entries.iter().map(|s| s.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["000003", "000002", "000010"]);
    }

    #[test]
    fn unsorted_order_compares_equal() {
        let a = employee("000002", "Alex Yeoh", "Engineering");
        let b = employee("000001", "Bernice Yu", "Engineering");
        let order: SortOrder<EmployeeSortKey> = SortOrder::unsorted();
        assert_eq!(order.compare(&a, &b), Ordering::Equal);
    }
}
