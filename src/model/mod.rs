pub mod classify;
pub mod date;
pub mod item;
pub mod parser;

pub use classify::{classify, urgency};
pub use date::parse_date;
pub use item::{Task, UNKNOWN_PERSON, UrgencyStatus, is_completion_note};
pub use parser::{RawRow, parse_all, parse_row};
