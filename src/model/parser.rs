// File: ./src/model/parser.rs
// Maps raw sheet rows onto classified `Task`s.
//
// Column layout (0-based):
//   0 sequence number | 1 person | 2 description | 3 priority | 4 deadline
//   5 progress note   | 6 completion date | 7 remarks
//
// Columns 5..=7 are optional. Positions are resolved once, here, into a
// `RawRow`; nothing downstream indexes raw columns.
use crate::model::classify::classify;
use crate::model::date::parse_date;
use crate::model::item::{Task, TaskFields};
use chrono::NaiveDate;

/// Rows shorter than this are dropped.
pub const MIN_COLUMNS: usize = 5;
/// Rows are padded with empty cells up to this width.
pub const ROW_WIDTH: usize = 8;

/// A sheet row after padding, with every column named.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub sequence_number: String,
    pub person_name: String,
    pub description: String,
    pub priority_label: String,
    pub deadline: String,
    pub progress_note: String,
    pub completion_date: String,
    pub remarks: String,
}

impl RawRow {
    /// Pads `columns` to [`ROW_WIDTH`] and names them. Returns `None` for rows
    /// with fewer than [`MIN_COLUMNS`] cells. Cells past the eighth are ignored.
    pub fn from_columns<S: AsRef<str>>(columns: &[S]) -> Option<Self> {
        if columns.len() < MIN_COLUMNS {
            return None;
        }
        let mut cells = columns
            .iter()
            .map(|c| c.as_ref().to_string())
            .chain(std::iter::repeat(String::new()))
            .take(ROW_WIDTH);

        let mut next = || cells.next().unwrap_or_default();
        Some(Self {
            sequence_number: next(),
            person_name: next(),
            description: next(),
            priority_label: next(),
            deadline: next(),
            progress_note: next(),
            completion_date: next(),
            remarks: next(),
        })
    }

    /// A row with neither a person nor a description is noise.
    pub fn is_blank(&self) -> bool {
        self.person_name.trim().is_empty() && self.description.trim().is_empty()
    }
}

/// Parses one data row. `row_number` is the 1-based sheet row, kept on the task
/// for diagnostics. Returns `None` for rows that are too short or blank.
pub fn parse_row<S: AsRef<str>>(
    columns: &[S],
    row_number: usize,
    today: NaiveDate,
) -> Option<Task> {
    let Some(row) = RawRow::from_columns(columns) else {
        log::debug!(
            "Row {}: dropped, only {} column(s)",
            row_number,
            columns.len()
        );
        return None;
    };
    if row.is_blank() {
        log::debug!("Row {}: dropped, no person and no description", row_number);
        return None;
    }

    let deadline = parse_date(&row.deadline);
    if deadline.is_none() && !row.deadline.trim().is_empty() {
        log::warn!(
            "Row {}: could not parse deadline '{}'",
            row_number,
            row.deadline.trim()
        );
    }
    let completion_date = parse_date(&row.completion_date);

    let mut task = Task::new(TaskFields {
        sequence_number: row.sequence_number,
        person_name: row.person_name,
        description: row.description,
        priority_label: row.priority_label,
        deadline,
        deadline_raw: row.deadline,
        completion_date,
        completion_date_raw: row.completion_date,
        progress_note: row.progress_note,
        remarks: row.remarks,
        source_row: row_number,
    });
    classify(&mut task, today);
    Some(task)
}

/// Parses every row after the header, keeping sheet order.
pub fn parse_all<R: AsRef<[String]>>(rows: &[R], today: NaiveDate) -> Vec<Task> {
    let tasks: Vec<Task> = rows
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(idx, row)| parse_row(row.as_ref(), idx + 1, today))
        .collect();

    let data_rows = rows.len().saturating_sub(1);
    let completed = tasks.iter().filter(|t| t.is_completed()).count();
    log::info!(
        "Parsed {} tasks from {} data rows ({} dropped)",
        tasks.len(),
        data_rows,
        data_rows - tasks.len()
    );
    log::info!(
        "Tasks: {} completed, {} incomplete",
        completed,
        tasks.len() - completed
    );
    tasks
}
