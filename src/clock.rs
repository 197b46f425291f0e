// File: ./src/clock.rs
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Supplies "today" for classification.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    /// Current wall-clock time, formatted for display in the clock's zone.
    fn now_display(&self) -> String;
}

/// System clock read in a fixed IANA zone.
#[derive(Debug, Clone, Copy)]
pub struct ZonedClock {
    tz: Tz,
}

impl ZonedClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for ZonedClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    fn now_display(&self) -> String {
        Utc::now()
            .with_timezone(&self.tz)
            .format("%d/%m/%Y %H:%M:%S %Z")
            .to_string()
    }
}

/// Clock pinned to one instant, for tests and reproducible runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Noon UTC on `date`.
    pub fn on(date: NaiveDate) -> Self {
        let now = date
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_default();
        Self { now }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    fn now_display(&self) -> String {
        self.now.format("%d/%m/%Y %H:%M:%S UTC").to_string()
    }
}
