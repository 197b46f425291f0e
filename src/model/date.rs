// File: ./src/model/date.rs
// Resolves the deadline / completion-date cells of a sheet into calendar dates.
//
// Accepted forms, first match wins:
//   D/M/YYYY or DD/MM/YYYY
//   YYYY-M-D or YYYY-MM-DD
//   a spreadsheet day serial in [1, 100000] (days since 1899-12-30)
//
// Anything else resolves to `None`. Callers treat that exactly like an empty cell.
use chrono::{Duration, NaiveDate};

pub const SERIAL_MIN: f64 = 1.0;
pub const SERIAL_MAX: f64 = 100_000.0;

/// Base of the spreadsheet day-serial calendar. Serial 1 is 1899-12-31.
pub fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// Parses a raw cell into a date. Never fails loudly.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let text = input.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(parts) = split_numeric(text, '/')
        && let [day, month, year] = parts.as_slice()
        && is_short(day)
        && is_short(month)
        && year.len() == 4
    {
        return ymd(year, month, day).or_else(|| {
            log::warn!("Invalid calendar date in '{}'", text);
            None
        });
    }

    if let Some(parts) = split_numeric(text, '-')
        && let [year, month, day] = parts.as_slice()
        && year.len() == 4
        && is_short(month)
        && is_short(day)
    {
        return ymd(year, month, day).or_else(|| {
            log::warn!("Invalid calendar date in '{}'", text);
            None
        });
    }

    if let Some(date) = parse_serial(text) {
        log::debug!("Parsed serial number {} as {}", text, date);
        return Some(date);
    }

    log::debug!("Could not parse date: '{}'", text);
    None
}

/// Interprets `text` as a day serial. Fractions (time of day) are truncated.
pub fn parse_serial(text: &str) -> Option<NaiveDate> {
    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (text, None),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // "45292." is a whole day; only the digits after the dot are checked.
    if let Some(f) = frac
        && !f.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let serial: f64 = text.parse().ok()?;
    if !(SERIAL_MIN..=SERIAL_MAX).contains(&serial) {
        return None;
    }
    serial_epoch().checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// Splits on `sep` and keeps the pieces only if every piece is a non-empty run of ASCII digits.
fn split_numeric(text: &str, sep: char) -> Option<Vec<&str>> {
    let parts: Vec<&str> = text.split(sep).collect();
    if parts.len() < 2 {
        return None;
    }
    if parts
        .iter()
        .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
    {
        Some(parts)
    } else {
        None
    }
}

fn is_short(part: &str) -> bool {
    (1..=2).contains(&part.len())
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}
