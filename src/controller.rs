// File: src/controller.rs
//! Report pipeline: refresh rows through the cache, parse and classify them
//! against the clock's "today", then render the requested view.
//!
//! Front-ends (the CLI, a chat bot, a timer) go through this controller so the
//! cache is shared and failures are reported the same way everywhere.
use crate::cache::{CacheStatus, RefreshCache};
use crate::clock::Clock;
use crate::model::{Task, parse_all};
use crate::report::{ReportKind, ReportOptions, format_date, render};
use crate::source::RowSource;
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;

pub const UNAVAILABLE_MESSAGE: &str =
    "Unable to refresh data or build the report. Please try again later.";
pub const UNAUTHORIZED_MESSAGE: &str = "This chat is not allowed to use this bot.";

pub struct ReportController<S, C> {
    cache: Arc<RefreshCache<S>>,
    clock: C,
    max_items: usize,
    allowed_callers: Vec<i64>,
}

impl<S: RowSource, C: Clock> ReportController<S, C> {
    pub fn new(
        cache: Arc<RefreshCache<S>>,
        clock: C,
        max_items: usize,
        allowed_callers: Vec<i64>,
    ) -> Self {
        Self {
            cache,
            clock,
            max_items,
            allowed_callers,
        }
    }

    pub fn cache(&self) -> &Arc<RefreshCache<S>> {
        &self.cache
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// An empty allow-list admits everyone. `None` is a local operator.
    pub fn is_authorized(&self, caller: Option<i64>) -> bool {
        match caller {
            None => true,
            Some(id) => self.allowed_callers.is_empty() || self.allowed_callers.contains(&id),
        }
    }

    /// Fresh `Task`s for this call. Tasks are never cached, only rows are.
    pub async fn load_tasks(&self, force_refresh: bool) -> Result<Vec<Task>> {
        self.load_tasks_on(self.clock.today(), force_refresh).await
    }

    async fn load_tasks_on(&self, today: NaiveDate, force_refresh: bool) -> Result<Vec<Task>> {
        let rows = self.cache.fetch(force_refresh).await?;
        Ok(parse_all(rows.as_slice(), today))
    }

    /// Classification and rendering share one reading of the clock.
    pub async fn build(&self, kind: &ReportKind, force_refresh: bool) -> Result<String> {
        let today = self.clock.today();
        let force = force_refresh || kind.wants_fresh_data();
        let tasks = self.load_tasks_on(today, force).await?;
        let opts = ReportOptions {
            today,
            max_items: self.max_items,
        };
        log::info!("Building {} report from {} tasks", kind, tasks.len());
        Ok(render(kind, &tasks, opts))
    }

    /// User-facing entry point: never returns a raw error.
    pub async fn respond(&self, caller: Option<i64>, kind: &ReportKind, force_refresh: bool) -> String {
        if !self.is_authorized(caller) {
            log::warn!("Rejected {} report request from caller {:?}", kind, caller);
            return UNAUTHORIZED_MESSAGE.to_string();
        }
        match self.build(kind, force_refresh).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("Failed to build {} report: {:#}", kind, e);
                UNAVAILABLE_MESSAGE.to_string()
            }
        }
    }

    /// Drops cached rows and fetches again. Returns the data row count.
    pub async fn refresh(&self) -> Result<usize> {
        self.cache.invalidate().await;
        let rows = self.cache.fetch(false).await?;
        Ok(rows.len().saturating_sub(1))
    }

    pub async fn cache_status(&self) -> CacheStatus {
        self.cache.status().await
    }

    /// Clock, source and cache policy. Cached rows live only as long as this
    /// controller, so a one-shot process has nothing to report about them.
    pub fn status_text(&self) -> String {
        let ttl = self.cache.ttl();
        let lines = [
            format!("Time: {}", self.clock.now_display()),
            format!("Today: {}", format_date(Some(self.clock.today()))),
            format!("Source: {}", self.cache.source().describe()),
            if ttl.is_zero() {
                "Cache TTL: 0s (caching disabled)".to_string()
            } else {
                format!("Cache TTL: {}s", ttl.as_secs())
            },
        ];
        lines.join("\n")
    }
}
