// Tests for grouping, searching and per-person statistics.
use chrono::NaiveDate;
use sheetwatch::aggregate::{
    completed_between, count_by_status, filter_incomplete, group_by_person, group_by_status,
    person_summaries, search, week_bounds,
};
use sheetwatch::model::{Task, UNKNOWN_PERSON, UrgencyStatus, parse_all};
use strum::IntoEnumIterator;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()
}

/// (person, description, deadline, progress, completion date)
fn tasks(rows_in: &[(&str, &str, &str, &str, &str)]) -> Vec<Task> {
    let mut rows = vec![vec!["STT".to_string(); 8]];
    for (i, &(person, desc, deadline, progress, done)) in rows_in.iter().enumerate() {
        rows.push(
            [
                (i + 1).to_string().as_str(),
                person,
                desc,
                "",
                deadline,
                progress,
                done,
                "",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        );
    }
    parse_all(&rows, today())
}

fn sample() -> Vec<Task> {
    tasks(&[
        ("Alice", "Budget review", "20/12/2024", "", ""),
        ("Bob", "Vendor call", "15/12/2024", "", ""),
        ("Alice", "Minutes", "25/12/2024", "", ""),
        ("", "Clean up drive", "26/12/2024", "", ""),
        ("Carol", "Quarterly REPORT", "28/12/2024", "", ""),
        ("Bob", "Archive", "", "", ""),
        ("Carol", "Onboarding", "10/01/2025", "", ""),
        ("Dan", "Release notes", "01/12/2024", "done", "23/12/2024"),
        ("Alice", "Old deadline", "23/12/2024", "", ""),
    ])
}

#[test]
fn test_group_by_status_has_all_keys() {
    let empty = Vec::<Task>::new();
    let groups = group_by_status(&empty);
    assert_eq!(groups.len(), 6);
    for status in UrgencyStatus::iter() {
        assert!(groups[&status].is_empty());
    }
}

#[test]
fn test_group_by_status_partitions_input() {
    let all = sample();
    let groups = group_by_status(&all);
    let total: usize = groups.values().map(|v| v.len()).sum();
    assert_eq!(total, all.len());

    assert_eq!(groups[&UrgencyStatus::Overdue].len(), 3);
    assert_eq!(groups[&UrgencyStatus::DueToday].len(), 1);
    assert_eq!(groups[&UrgencyStatus::DueTomorrow].len(), 1);
    assert_eq!(groups[&UrgencyStatus::DueSoon].len(), 1);
    assert_eq!(groups[&UrgencyStatus::NoDeadline].len(), 1);
    // Onboarding plus the completed release notes.
    assert_eq!(groups[&UrgencyStatus::OnTrack].len(), 2);
}

#[test]
fn test_overdue_bucket_is_most_overdue_first() {
    let all = sample();
    let groups = group_by_status(filter_incomplete(&all));
    let days: Vec<u32> = groups[&UrgencyStatus::Overdue]
        .iter()
        .map(|t| t.days_overdue())
        .collect();
    assert_eq!(days, vec![10, 5, 2]);
    assert!(days.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_overdue_ties_keep_sheet_order() {
    let all = tasks(&[
        ("Alice", "first", "20/12/2024", "", ""),
        ("Bob", "second", "20/12/2024", "", ""),
        ("Carol", "third", "20/12/2024", "", ""),
    ]);
    let groups = group_by_status(&all);
    let names: Vec<&str> = groups[&UrgencyStatus::Overdue]
        .iter()
        .map(|t| t.description.as_str())
        .collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[test]
fn test_filter_incomplete_drops_completed() {
    let all = sample();
    let open = filter_incomplete(&all);
    assert_eq!(open.len(), all.len() - 1);
    assert!(open.iter().all(|t| !t.is_completed()));
}

#[test]
fn test_group_by_person_uses_unknown_for_empty_names() {
    let all = sample();
    let groups = group_by_person(&all);
    assert_eq!(groups[UNKNOWN_PERSON].len(), 1);
    assert_eq!(groups["Alice"].len(), 3);
    assert!(!groups.contains_key(""));

    let keys: Vec<&String> = groups.keys().collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_search_is_case_insensitive_on_person_and_description() {
    let all = sample();
    let hits = search(&all, "report");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].description, "Quarterly REPORT");

    let hits = search(&all, "ALICE");
    assert_eq!(hits.len(), 3);

    assert!(search(&all, "nothing like this").is_empty());
}

#[test]
fn test_search_with_empty_keyword_matches_everything() {
    let all = sample();
    assert_eq!(search(&all, "").len(), all.len());
}

#[test]
fn test_count_by_status_matches_groups() {
    let all = sample();
    let counts = count_by_status(&all);
    assert_eq!(counts.len(), 6);
    assert_eq!(counts[&UrgencyStatus::Overdue], 3);
    assert_eq!(counts.values().sum::<usize>(), all.len());
}

#[test]
fn test_person_summaries_order() {
    let all = sample();
    let summaries = person_summaries(filter_incomplete(&all));
    let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
    // Alice: 2 overdue; Bob: 1 overdue; Carol: 2 open, 0 overdue; Unknown: 1 open.
    assert_eq!(names, vec!["Alice", "Bob", "Carol", UNKNOWN_PERSON]);

    let alice = &summaries[0];
    assert_eq!(alice.total, 3);
    assert_eq!(alice.overdue, 2);
    assert_eq!(alice.due_soon, 1);

    let carol = &summaries[2];
    assert_eq!(carol.due_soon, 1);
}

#[test]
fn test_week_bounds() {
    // 2024-12-25 is a Wednesday.
    let (start, end) = week_bounds(today());
    assert_eq!(start, NaiveDate::from_ymd_opt(2024, 12, 23).unwrap());
    assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 29).unwrap());

    let monday = NaiveDate::from_ymd_opt(2024, 12, 23).unwrap();
    assert_eq!(week_bounds(monday).0, monday);

    let sunday = NaiveDate::from_ymd_opt(2024, 12, 29).unwrap();
    assert_eq!(week_bounds(sunday), (monday, sunday));
}

#[test]
fn test_completed_between_is_inclusive() {
    let all = tasks(&[
        ("Alice", "before", "", "done", "22/12/2024"),
        ("Alice", "monday", "", "done", "23/12/2024"),
        ("Bob", "sunday", "", "done", "29/12/2024"),
        ("Bob", "after", "", "done", "30/12/2024"),
        ("Carol", "undated", "", "done", ""),
    ]);
    let (start, end) = week_bounds(today());
    let hits: Vec<&str> = completed_between(&all, start, end)
        .iter()
        .map(|t| t.description.as_str())
        .collect();
    assert_eq!(hits, vec!["monday", "sunday"]);
}
