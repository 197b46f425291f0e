// File: src/aggregate.rs
//! Grouping, sorting and lookup over classified tasks.
//!
//! Every function borrows its input and returns references in a stable order,
//! so the same task list can feed several views without cloning.
use crate::model::{Task, UrgencyStatus};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

pub type StatusGroups<'a> = BTreeMap<UrgencyStatus, Vec<&'a Task>>;
pub type PersonGroups<'a> = BTreeMap<String, Vec<&'a Task>>;

/// Per-person counters for the weekly summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonSummary {
    pub name: String,
    pub total: usize,
    pub overdue: usize,
    /// Due today, tomorrow or within 2-3 days.
    pub due_soon: usize,
}

/// The "incomplete only" filter every urgency view applies first.
pub fn filter_incomplete<'a, I>(tasks: I) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().filter(|t| !t.is_completed()).collect()
}

/// Buckets tasks by status. All six keys are always present. The `Overdue`
/// bucket is sorted most-overdue first; the others keep input order.
pub fn group_by_status<'a, I>(tasks: I) -> StatusGroups<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut groups: StatusGroups<'a> = UrgencyStatus::iter().map(|s| (s, Vec::new())).collect();
    for task in tasks {
        groups.entry(task.status()).or_default().push(task);
    }
    if let Some(overdue) = groups.get_mut(&UrgencyStatus::Overdue) {
        // Stable sort keeps sheet order among equal counts.
        overdue.sort_by(|a, b| b.days_overdue().cmp(&a.days_overdue()));
    }
    groups
}

/// Buckets tasks by person name; empty names go under [`crate::model::UNKNOWN_PERSON`].
/// Keys iterate alphabetically; tasks keep input order within a person.
pub fn group_by_person<'a, I>(tasks: I) -> PersonGroups<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut groups: PersonGroups<'a> = BTreeMap::new();
    for task in tasks {
        groups
            .entry(task.person_key().to_string())
            .or_default()
            .push(task);
    }
    groups
}

/// Case-insensitive substring search on person name or description.
/// An empty keyword matches everything.
pub fn search<'a, I>(tasks: I, keyword: &str) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let needle = keyword.to_lowercase();
    tasks
        .into_iter()
        .filter(|t| t.matches_keyword(&needle))
        .collect()
}

pub fn count_by_status<'a, I>(tasks: I) -> BTreeMap<UrgencyStatus, usize>
where
    I: IntoIterator<Item = &'a Task>,
{
    group_by_status(tasks)
        .into_iter()
        .map(|(status, list)| (status, list.len()))
        .collect()
}

/// Per-person totals, sorted by overdue count, then total (both descending),
/// then name.
pub fn person_summaries<'a, I>(tasks: I) -> Vec<PersonSummary>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut summaries: Vec<PersonSummary> = group_by_person(tasks)
        .into_iter()
        .map(|(name, list)| PersonSummary {
            total: list.len(),
            overdue: list
                .iter()
                .filter(|t| t.status() == UrgencyStatus::Overdue)
                .count(),
            due_soon: list.iter().filter(|t| t.status().is_upcoming()).count(),
            name,
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.overdue
            .cmp(&a.overdue)
            .then(b.total.cmp(&a.total))
            .then_with(|| a.name.cmp(&b.name))
    });
    summaries
}

/// Monday and Sunday of the week containing `today`.
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    (start, start + Duration::days(6))
}

/// Tasks whose completion date falls in `start..=end`, in input order.
pub fn completed_between<'a, I>(tasks: I, start: NaiveDate, end: NaiveDate) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter(|t| t.completion_date.is_some_and(|d| start <= d && d <= end))
        .collect()
}
