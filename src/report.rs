// File: ./src/report.rs
//! Plain-text renderers for the report views.
//!
//! Renderers take already-classified tasks and never touch the source. Urgency
//! views drop completed tasks first so finished work never shows up as overdue.
use crate::aggregate::{
    completed_between, filter_incomplete, group_by_person, group_by_status, person_summaries,
    week_bounds,
};
use crate::model::{Task, UrgencyStatus};
use chrono::NaiveDate;
use std::fmt;
use unicode_width::UnicodeWidthChar;

const RULE_WIDTH: usize = 50;
const DESCRIPTION_WIDTH: usize = 60;
const NO_DEADLINE_CAP: usize = 5;
const PER_PERSON_CAP: usize = 5;
const TOP_OVERDUE: usize = 10;
const SEARCH_CAP: usize = 15;
/// Early/late narrative is only shown for gaps up to this many days; larger
/// gaps are almost always a typo in one of the two dates.
const MAX_NARRATIVE_DAYS: i64 = 90;

/// Which view to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    Daily,
    Weekly,
    Today,
    OverdueByPerson,
    DueSoon,
    Search(String),
}

impl ReportKind {
    /// Scheduled-style digests always re-read the sheet.
    pub fn wants_fresh_data(&self) -> bool {
        matches!(self, ReportKind::Daily | ReportKind::Weekly)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Daily => write!(f, "daily"),
            ReportKind::Weekly => write!(f, "weekly"),
            ReportKind::Today => write!(f, "today"),
            ReportKind::OverdueByPerson => write!(f, "overdue"),
            ReportKind::DueSoon => write!(f, "due-soon"),
            ReportKind::Search(k) => write!(f, "search '{}'", k),
        }
    }
}

/// Inputs shared by every renderer.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub today: NaiveDate,
    /// Items listed per section before "... and N more".
    pub max_items: usize,
}

pub fn render(kind: &ReportKind, tasks: &[Task], opts: ReportOptions) -> String {
    match kind {
        ReportKind::Daily => daily_report(tasks, opts),
        ReportKind::Weekly => weekly_report(tasks, opts),
        ReportKind::Today => today_report(tasks, opts),
        ReportKind::OverdueByPerson => overdue_by_person_report(tasks),
        ReportKind::DueSoon => due_soon_report(tasks, opts),
        ReportKind::Search(keyword) => {
            let hits = crate::aggregate::search(tasks, keyword);
            search_report(&hits, keyword)
        }
    }
}

// --- Formatting helpers ---

pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d/%m/%Y").to_string(),
        None => "Not set".to_string(),
    }
}

/// Cuts `text` to `max_width` display columns, ending with "..." when cut.
pub fn truncate_text(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "task" } else { "tasks" }
}

pub fn task_line(task: &Task, show_person: bool, show_days_overdue: bool) -> String {
    let mut parts = Vec::new();
    if show_person && !task.person_name.is_empty() {
        parts.push(format!("[{}]", task.person_name));
    }
    parts.push(truncate_text(&task.description, DESCRIPTION_WIDTH));
    if task.deadline.is_some() {
        parts.push(format!("due {}", format_date(task.deadline)));
    }
    if show_days_overdue && task.days_overdue() > 0 {
        parts.push(format!("{} day(s) late", task.days_overdue()));
    }
    parts.join(" | ")
}

/// Numbered list of at most `cap` tasks, then "... and N more".
fn push_list(
    lines: &mut Vec<String>,
    tasks: &[&Task],
    cap: usize,
    indent: &str,
    show_person: bool,
    show_days_overdue: bool,
) {
    for (i, task) in tasks.iter().take(cap).enumerate() {
        lines.push(format!(
            "{}{}. {}",
            indent,
            i + 1,
            task_line(task, show_person, show_days_overdue)
        ));
    }
    if tasks.len() > cap {
        lines.push(format!("{}... and {} more", indent, tasks.len() - cap));
    }
}

fn push_rule(lines: &mut Vec<String>) {
    lines.push("=".repeat(RULE_WIDTH));
}

// --- Views ---

/// Morning digest: every urgency bucket of incomplete work.
pub fn daily_report(tasks: &[Task], opts: ReportOptions) -> String {
    let incomplete = filter_incomplete(tasks);
    let groups = group_by_status(incomplete.iter().copied());
    let cap = opts.max_items;

    let mut lines = Vec::new();
    push_rule(&mut lines);
    lines.push("DAILY PROGRESS REPORT".to_string());
    lines.push(format!("Date: {}", format_date(Some(opts.today))));
    push_rule(&mut lines);
    lines.push(String::new());
    lines.push(format!("Open tasks: {}", incomplete.len()));
    lines.push(String::new());

    let sections = [
        (UrgencyStatus::Overdue, "OVERDUE", true),
        (UrgencyStatus::DueToday, "DUE TODAY", false),
        (UrgencyStatus::DueTomorrow, "DUE TOMORROW", false),
        (UrgencyStatus::DueSoon, "DUE IN 2-3 DAYS", false),
    ];
    for (status, title, show_late) in sections {
        let bucket = &groups[&status];
        if bucket.is_empty() {
            continue;
        }
        lines.push(title.to_string());
        lines.push(format!("   Total: {} {}", bucket.len(), plural(bucket.len())));
        lines.push(String::new());
        push_list(&mut lines, bucket, cap, "", true, show_late);
        lines.push(String::new());
    }

    let no_deadline = &groups[&UrgencyStatus::NoDeadline];
    if !no_deadline.is_empty() {
        lines.push("NO DEADLINE".to_string());
        lines.push(format!(
            "   Total: {} {} (deadline missing)",
            no_deadline.len(),
            plural(no_deadline.len())
        ));
        lines.push(String::new());
        push_list(&mut lines, no_deadline, NO_DEADLINE_CAP, "", true, false);
        lines.push(String::new());
    }

    let on_track = &groups[&UrgencyStatus::OnTrack];
    if !on_track.is_empty() {
        lines.push(format!("On track: {} {}", on_track.len(), plural(on_track.len())));
        lines.push(String::new());
    }

    push_rule(&mut lines);
    lines.join("\n")
}

/// What needs attention today: overdue, due today, and a peek at tomorrow.
pub fn today_report(tasks: &[Task], opts: ReportOptions) -> String {
    let incomplete = filter_incomplete(tasks);
    let groups = group_by_status(incomplete);
    let cap = opts.max_items;

    let mut lines = vec![
        "TODAY'S TASKS".to_string(),
        format_date(Some(opts.today)),
        String::new(),
    ];

    let overdue = &groups[&UrgencyStatus::Overdue];
    if !overdue.is_empty() {
        lines.push(format!("Overdue: {} {}", overdue.len(), plural(overdue.len())));
        push_list(&mut lines, overdue, cap, "", true, true);
        lines.push(String::new());
    }

    let due_today = &groups[&UrgencyStatus::DueToday];
    if !due_today.is_empty() {
        lines.push(format!("Due today: {} {}", due_today.len(), plural(due_today.len())));
        push_list(&mut lines, due_today, cap, "", true, false);
        lines.push(String::new());
    }

    let tomorrow = &groups[&UrgencyStatus::DueTomorrow];
    if !tomorrow.is_empty() {
        lines.push(format!("Tomorrow: {} {}", tomorrow.len(), plural(tomorrow.len())));
        push_list(&mut lines, tomorrow, cap.min(5), "", true, false);
        lines.push(String::new());
    }

    if overdue.is_empty() && due_today.is_empty() {
        lines.push("Nothing overdue or due today.".to_string());
    }
    lines.join("\n")
}

/// Who is behind: overdue tasks grouped per person, busiest first.
pub fn overdue_by_person_report(tasks: &[Task]) -> String {
    let overdue: Vec<&Task> = filter_incomplete(tasks)
        .into_iter()
        .filter(|t| t.status() == UrgencyStatus::Overdue)
        .collect();
    if overdue.is_empty() {
        return "No overdue tasks.".to_string();
    }

    let mut people: Vec<(String, Vec<&Task>)> = group_by_person(overdue).into_iter().collect();
    // Stable: ties stay alphabetical.
    people.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let mut lines = vec!["WHO IS OVERDUE".to_string(), String::new()];
    for (name, person_tasks) in &people {
        lines.push(format!(
            "{}: {} overdue {}",
            name,
            person_tasks.len(),
            plural(person_tasks.len())
        ));
        push_list(&mut lines, person_tasks, PER_PERSON_CAP, "   ", false, true);
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Tasks due within the next one to three days.
pub fn due_soon_report(tasks: &[Task], opts: ReportOptions) -> String {
    let groups = group_by_status(filter_incomplete(tasks));
    let cap = opts.max_items;

    let mut lines = vec!["DUE SOON (1-3 DAYS)".to_string(), String::new()];

    let tomorrow = &groups[&UrgencyStatus::DueTomorrow];
    if !tomorrow.is_empty() {
        lines.push(format!("Tomorrow: {} {}", tomorrow.len(), plural(tomorrow.len())));
        push_list(&mut lines, tomorrow, cap, "", true, false);
        lines.push(String::new());
    }

    let soon = &groups[&UrgencyStatus::DueSoon];
    if !soon.is_empty() {
        lines.push(format!("In 2-3 days: {} {}", soon.len(), plural(soon.len())));
        push_list(&mut lines, soon, cap, "", true, false);
        lines.push(String::new());
    }

    if tomorrow.is_empty() && soon.is_empty() {
        lines.push("Nothing due in the next 1-3 days.".to_string());
    }
    lines.join("\n")
}

/// How a completion date relates to the deadline, in words.
pub fn completion_narrative(task: &Task) -> String {
    let Some(done) = task.completion_date else {
        return "completion date not set".to_string();
    };
    let plain = format!("completed {}", format_date(Some(done)));
    let Some(deadline) = task.deadline else {
        return plain;
    };

    let delta = (done - deadline).num_days();
    if delta.abs() > MAX_NARRATIVE_DAYS {
        return plain;
    }
    match delta {
        0 => "finished on the deadline".to_string(),
        d if d < 0 => format!("finished {} day(s) early", -d),
        d => format!("finished {} day(s) late", d),
    }
}

/// Friday wrap-up: this week's completions plus the current backlog.
pub fn weekly_report(tasks: &[Task], opts: ReportOptions) -> String {
    let (week_start, week_end) = week_bounds(opts.today);
    let completed = completed_between(tasks, week_start, week_end);
    let incomplete = filter_incomplete(tasks);
    let groups = group_by_status(incomplete.iter().copied());

    let mut lines = Vec::new();
    push_rule(&mut lines);
    lines.push("WEEKLY REPORT".to_string());
    lines.push(format!(
        "Week of {} to {}",
        format_date(Some(week_start)),
        format_date(Some(week_end))
    ));
    push_rule(&mut lines);
    lines.push(String::new());

    lines.push(format!(
        "COMPLETED THIS WEEK: {} {}",
        completed.len(),
        plural(completed.len())
    ));
    lines.push(String::new());
    if !completed.is_empty() {
        lines.push("By person:".to_string());
        for (name, person_tasks) in group_by_person(completed) {
            lines.push(format!(
                "   {}: {} {}",
                name,
                person_tasks.len(),
                plural(person_tasks.len())
            ));
            for task in person_tasks.iter().take(PER_PERSON_CAP) {
                lines.push(format!(
                    "      - {} ({})",
                    truncate_text(&task.description, RULE_WIDTH),
                    completion_narrative(task)
                ));
            }
            if person_tasks.len() > PER_PERSON_CAP {
                lines.push(format!(
                    "      ... and {} more",
                    person_tasks.len() - PER_PERSON_CAP
                ));
            }
        }
        lines.push(String::new());
    }

    lines.push("CURRENT STATUS".to_string());
    lines.push(format!("   Open: {} {}", incomplete.len(), plural(incomplete.len())));
    lines.push(String::new());

    let overdue = &groups[&UrgencyStatus::Overdue];
    if !overdue.is_empty() {
        lines.push("OVERDUE".to_string());
        lines.push(format!("   Total: {} {}", overdue.len(), plural(overdue.len())));
        lines.push(String::new());
        lines.push(format!("   Top {} most overdue:", TOP_OVERDUE));
        for (i, task) in overdue.iter().take(TOP_OVERDUE).enumerate() {
            lines.push(format!("   {}. {}", i + 1, task_line(task, true, true)));
        }
        lines.push(String::new());
    }

    lines.push("OPEN TASKS BY PERSON".to_string());
    lines.push(String::new());
    for summary in person_summaries(incomplete) {
        lines.push(summary.name.clone());
        lines.push(format!("   Open: {}", summary.total));
        lines.push(format!("   Overdue: {}", summary.overdue));
        lines.push(format!("   Due within 3 days: {}", summary.due_soon));
        lines.push(String::new());
    }

    push_rule(&mut lines);
    lines.join("\n")
}

/// Search hits with their status, at most [`SEARCH_CAP`] shown.
pub fn search_report(hits: &[&Task], keyword: &str) -> String {
    if hits.is_empty() {
        return format!("No results for '{}'", keyword);
    }

    let mut lines = vec![
        format!("SEARCH RESULTS: '{}'", keyword),
        format!("   Found: {} {}", hits.len(), plural(hits.len())),
        String::new(),
    ];
    for (i, task) in hits.iter().take(SEARCH_CAP).enumerate() {
        let overdue = task.status() == UrgencyStatus::Overdue;
        lines.push(format!("{}. {}", i + 1, task_line(task, true, overdue)));
        let label = if task.is_completed() {
            "Completed".to_string()
        } else {
            task.status().to_string()
        };
        lines.push(format!("   {}", label));
        lines.push(String::new());
    }
    if hits.len() > SEARCH_CAP {
        lines.push(format!("... and {} more results", hits.len() - SEARCH_CAP));
    }
    lines.join("\n")
}
