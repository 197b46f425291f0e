// File: ./src/model/classify.rs
//! Deadline classification relative to a given "today".
//!
//! Rules, first match wins:
//! 1. completed          -> `OnTrack`, 0
//! 2. no deadline        -> `NoDeadline`, 0
//! 3. delta = deadline - today (days)
//!    - delta < 0        -> `Overdue`, -delta
//!    - delta == 0       -> `DueToday`
//!    - delta == 1       -> `DueTomorrow`
//!    - delta in {2, 3}  -> `DueSoon`
//!    - delta >= 4       -> `OnTrack`
//!
//! Overdue counts are not capped; sanity limits belong to whoever renders them.
use crate::model::item::{Task, UrgencyStatus};
use chrono::NaiveDate;

/// Pure status computation over the inputs that determine it.
pub fn urgency(
    deadline: Option<NaiveDate>,
    is_completed: bool,
    today: NaiveDate,
) -> (UrgencyStatus, u32) {
    // Completion suppresses urgency even for long-past deadlines.
    if is_completed {
        return (UrgencyStatus::OnTrack, 0);
    }

    let Some(deadline) = deadline else {
        return (UrgencyStatus::NoDeadline, 0);
    };

    let delta = (deadline - today).num_days();
    match delta {
        d if d < 0 => (
            UrgencyStatus::Overdue,
            u32::try_from(d.unsigned_abs()).unwrap_or(u32::MAX),
        ),
        0 => (UrgencyStatus::DueToday, 0),
        1 => (UrgencyStatus::DueTomorrow, 0),
        2 | 3 => (UrgencyStatus::DueSoon, 0),
        _ => (UrgencyStatus::OnTrack, 0),
    }
}

/// Writes `status` and `days_overdue` on `task`. Relies on `is_completed`
/// having been set when the task was built.
pub fn classify(task: &mut Task, today: NaiveDate) -> &mut Task {
    let (status, days_overdue) = urgency(task.deadline, task.is_completed, today);
    task.status = status;
    task.days_overdue = days_overdue;
    task
}
