// Tests for the report pipeline: cache, parse, classify, render.
use anyhow::{Result, bail};
use chrono::NaiveDate;
use sheetwatch::cache::RefreshCache;
use sheetwatch::clock::{Clock, FixedClock};
use sheetwatch::controller::{ReportController, UNAUTHORIZED_MESSAGE, UNAVAILABLE_MESSAGE};
use sheetwatch::model::UrgencyStatus;
use sheetwatch::report::ReportKind;
use sheetwatch::source::{RowSource, Rows};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Clone, Default)]
struct SheetStub {
    rows: Rows,
    calls: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl RowSource for SheetStub {
    async fn fetch(&self) -> Result<Rows> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            bail!("connection reset");
        }
        Ok(self.rows.clone())
    }

    fn describe(&self) -> String {
        "stub".to_string()
    }
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn stub() -> SheetStub {
    SheetStub {
        rows: vec![
            row(&["STT", "Person", "Task", "Priority", "Deadline", "Progress", "Done", "Notes"]),
            row(&["1", "Alice", "Budget review", "", "20/12/2024"]),
            row(&["2", "Bob", "Vendor call", "", "25/12/2024"]),
            row(&["3", "Carol", "Release notes", "", "01/12/2024", "done", "23/12/2024"]),
            row(&["4"]),
        ],
        ..Default::default()
    }
}

fn controller(
    source: SheetStub,
    allowed: Vec<i64>,
) -> ReportController<SheetStub, FixedClock> {
    let cache = Arc::new(RefreshCache::new(source, Duration::from_secs(300)));
    let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap());
    ReportController::new(cache, clock, 10, allowed)
}

#[tokio::test]
async fn test_load_tasks_classifies_against_clock() {
    let ctl = controller(stub(), vec![]);
    let tasks = ctl.load_tasks(false).await.unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].status(), UrgencyStatus::Overdue);
    assert_eq!(tasks[0].days_overdue(), 5);
    assert_eq!(tasks[1].status(), UrgencyStatus::DueToday);
    assert!(tasks[2].is_completed());
}

#[tokio::test]
async fn test_interactive_reports_use_the_cache() {
    let source = stub();
    let ctl = controller(source.clone(), vec![]);

    let first = ctl.respond(None, &ReportKind::Today, false).await;
    let second = ctl.respond(None, &ReportKind::OverdueByPerson, false).await;

    assert!(first.contains("Due today: 1 task"));
    assert!(second.contains("Alice: 1 overdue task"));
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_digests_force_a_fetch() {
    let source = stub();
    let ctl = controller(source.clone(), vec![]);

    ctl.respond(None, &ReportKind::Today, false).await;
    let text = ctl.respond(None, &ReportKind::Daily, false).await;
    assert!(text.contains("DAILY PROGRESS REPORT"));
    ctl.respond(None, &ReportKind::Weekly, false).await;

    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_search_report_through_controller() {
    let ctl = controller(stub(), vec![]);
    let text = ctl
        .respond(None, &ReportKind::Search("VENDOR".to_string()), false)
        .await;
    assert!(text.contains("Vendor call"));
    assert!(!text.contains("Budget review"));
}

#[tokio::test]
async fn test_unauthorized_caller_gets_fixed_message() {
    let source = stub();
    let ctl = controller(source.clone(), vec![42, -1001]);

    assert!(ctl.is_authorized(Some(42)));
    assert!(ctl.is_authorized(None));
    assert!(!ctl.is_authorized(Some(7)));

    let text = ctl.respond(Some(7), &ReportKind::Today, false).await;
    assert_eq!(text, UNAUTHORIZED_MESSAGE);
    assert_eq!(source.calls.load(Ordering::SeqCst), 0, "no fetch for rejected callers");

    let text = ctl.respond(Some(-1001), &ReportKind::Today, false).await;
    assert_ne!(text, UNAUTHORIZED_MESSAGE);
}

#[tokio::test]
async fn test_empty_allow_list_admits_everyone() {
    let ctl = controller(stub(), vec![]);
    assert!(ctl.is_authorized(Some(123456)));
}

#[tokio::test]
async fn test_source_failure_becomes_generic_message() {
    let source = stub();
    source.failing.store(true, Ordering::SeqCst);
    let ctl = controller(source, vec![]);

    let text = ctl.respond(None, &ReportKind::DueSoon, false).await;
    assert_eq!(text, UNAVAILABLE_MESSAGE);
    assert!(!text.contains("connection reset"));

    assert!(ctl.build(&ReportKind::DueSoon, false).await.is_err());
}

#[tokio::test]
async fn test_refresh_reports_data_rows() {
    let source = stub();
    let ctl = controller(source.clone(), vec![]);

    ctl.load_tasks(false).await.unwrap();
    let n = ctl.refresh().await.unwrap();
    assert_eq!(n, 4);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);

    let status = ctl.cache_status().await;
    assert!(status.is_valid);
    assert_eq!(status.rows_cached, 5);
}

#[tokio::test]
async fn test_refresh_failure_propagates() {
    let source = stub();
    let ctl = controller(source.clone(), vec![]);
    ctl.load_tasks(false).await.unwrap();

    source.failing.store(true, Ordering::SeqCst);
    assert!(ctl.refresh().await.is_err());
    assert!(!ctl.cache_status().await.is_valid);
}

/// Moves one day forward every time it is read.
struct AdvancingClock {
    start: NaiveDate,
    reads: AtomicI64,
}

impl Clock for AdvancingClock {
    fn today(&self) -> NaiveDate {
        self.start + chrono::Duration::days(self.reads.fetch_add(1, Ordering::SeqCst))
    }

    fn now_display(&self) -> String {
        self.today().to_string()
    }
}

#[tokio::test]
async fn test_report_uses_one_today_throughout() {
    let source = SheetStub {
        rows: vec![
            row(&["STT", "Person", "Task", "Priority", "Deadline"]),
            row(&["1", "Alice", "Minutes", "", "25/12/2024"]),
        ],
        ..Default::default()
    };
    let cache = Arc::new(RefreshCache::new(source, Duration::from_secs(300)));
    let clock = AdvancingClock {
        start: NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
        reads: AtomicI64::new(0),
    };
    let ctl = ReportController::new(cache, clock, 10, vec![]);

    let text = ctl.build(&ReportKind::Today, false).await.unwrap();
    assert!(text.starts_with("TODAY'S TASKS\n25/12/2024\n"), "header date: {}", text);
    assert!(!text.contains("26/12/2024"));
    assert!(text.contains("Due today: 1 task"));
}

#[tokio::test]
async fn test_status_text_describes_source_and_policy() {
    let source = stub();
    let ctl = controller(source.clone(), vec![]);

    let text = ctl.status_text();
    assert!(text.contains("Today: 25/12/2024"));
    assert!(text.contains("Source: stub"));
    assert!(text.contains("Cache TTL: 300s"));
    assert!(!text.contains("rows"), "cached rows are per process: {}", text);
    assert_eq!(source.calls.load(Ordering::SeqCst), 0, "status never fetches");

    let cache = Arc::new(RefreshCache::new(stub(), Duration::ZERO));
    let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap());
    let uncached = ReportController::new(cache, clock, 10, vec![]);
    assert!(uncached.status_text().contains("Cache TTL: 0s (caching disabled)"));
}
