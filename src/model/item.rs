// File: ./src/model/item.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// Label used when a row has no person name.
pub const UNKNOWN_PERSON: &str = "Unknown";

/// Substrings of the progress column that mark a task as finished (matched case-insensitively).
pub const COMPLETION_KEYWORDS: [&str; 4] = ["hoàn thành", "hoan thanh", "completed", "done"];

/// Deadline-relative bucket of a task. Declaration order is display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyStatus {
    Overdue,
    DueToday,
    DueTomorrow,
    /// Two or three days left.
    DueSoon,
    OnTrack,
    NoDeadline,
}

impl UrgencyStatus {
    /// Statuses that count as "due soon" in per-person statistics (1-3 days, today included).
    pub fn is_upcoming(&self) -> bool {
        matches!(self, Self::DueToday | Self::DueTomorrow | Self::DueSoon)
    }
}

impl fmt::Display for UrgencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrgencyStatus::Overdue => write!(f, "Overdue"),
            UrgencyStatus::DueToday => write!(f, "Due today"),
            UrgencyStatus::DueTomorrow => write!(f, "Due tomorrow"),
            UrgencyStatus::DueSoon => write!(f, "Due in 2-3 days"),
            UrgencyStatus::OnTrack => write!(f, "On track"),
            UrgencyStatus::NoDeadline => write!(f, "No deadline"),
        }
    }
}

/// One work item read from a sheet row.
///
/// Text fields are trimmed on construction. `status`, `days_overdue` and
/// `is_completed` are derived: the completion flag comes from `progress_note`
/// and the other two are written only by [`crate::model::classify::classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub sequence_number: String,
    pub person_name: String,
    pub description: String,
    pub priority_label: String,

    pub deadline: Option<NaiveDate>,
    pub deadline_raw: String,
    pub completion_date: Option<NaiveDate>,
    pub completion_date_raw: String,

    pub progress_note: String,
    pub remarks: String,

    /// 1-based sheet row this task came from.
    pub source_row: usize,

    pub(crate) status: UrgencyStatus,
    pub(crate) days_overdue: u32,
    pub(crate) is_completed: bool,
}

/// Field values for [`Task::new`], already mapped from column positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TaskFields {
    pub sequence_number: String,
    pub person_name: String,
    pub description: String,
    pub priority_label: String,
    pub deadline: Option<NaiveDate>,
    pub deadline_raw: String,
    pub completion_date: Option<NaiveDate>,
    pub completion_date_raw: String,
    pub progress_note: String,
    pub remarks: String,
    pub source_row: usize,
}

impl Task {
    /// Builds an unclassified task. Completion is detected here so it is always
    /// known before the classifier runs.
    pub(crate) fn new(fields: TaskFields) -> Self {
        let progress_note = fields.progress_note.trim().to_string();
        let is_completed = is_completion_note(&progress_note);
        Self {
            sequence_number: fields.sequence_number.trim().to_string(),
            person_name: fields.person_name.trim().to_string(),
            description: fields.description.trim().to_string(),
            priority_label: fields.priority_label.trim().to_string(),
            deadline: fields.deadline,
            deadline_raw: fields.deadline_raw.trim().to_string(),
            completion_date: fields.completion_date,
            completion_date_raw: fields.completion_date_raw.trim().to_string(),
            progress_note,
            remarks: fields.remarks.trim().to_string(),
            source_row: fields.source_row,
            status: UrgencyStatus::NoDeadline,
            days_overdue: 0,
            is_completed,
        }
    }

    pub fn status(&self) -> UrgencyStatus {
        self.status
    }

    /// Days past the deadline. Zero unless the status is `Overdue`.
    pub fn days_overdue(&self) -> u32 {
        self.days_overdue
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Person name for grouping, with empty names mapped to [`UNKNOWN_PERSON`].
    pub fn person_key(&self) -> &str {
        if self.person_name.is_empty() {
            UNKNOWN_PERSON
        } else {
            &self.person_name
        }
    }

    /// Case-insensitive substring match on person name or description.
    /// `needle_lower` must already be lowercase.
    pub fn matches_keyword(&self, needle_lower: &str) -> bool {
        self.person_name.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: String = self.description.chars().take(30).collect();
        let deadline = self
            .deadline
            .map(|d| d.to_string())
            .unwrap_or_else(|| "none".to_string());
        write!(
            f,
            "Task({}: {}... | Deadline: {} | Status: {})",
            self.person_key(),
            preview,
            deadline,
            self.status
        )
    }
}

/// True when `note` contains one of [`COMPLETION_KEYWORDS`], ignoring case.
pub fn is_completion_note(note: &str) -> bool {
    if note.is_empty() {
        return false;
    }
    let lower = note.to_lowercase();
    COMPLETION_KEYWORDS.iter().any(|k| lower.contains(k))
}
