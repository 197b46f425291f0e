// File: ./src/cache.rs
// Time-bounded cache in front of a `RowSource`.
//
// The whole check -> fetch -> replace sequence runs under one async mutex, so
// two callers missing at the same moment produce a single source fetch and the
// second caller is served the fresh entry. A failed fetch leaves the previous
// entry in place but is still returned as an error; stale rows are never
// handed out in place of a failed refresh.
use crate::source::{RowSource, Rows};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry {
    rows: Arc<Rows>,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// Snapshot of the cache for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    pub is_valid: bool,
    pub age: Option<Duration>,
    pub rows_cached: usize,
}

#[derive(Debug)]
pub struct RefreshCache<S> {
    source: S,
    ttl: Duration,
    entry: Mutex<Option<CacheEntry>>,
}

impl<S: RowSource> RefreshCache<S> {
    /// `ttl` of zero disables caching: every fetch reaches the source.
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entry: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns cached rows while they are younger than the TTL, otherwise asks the
    /// source. `force_refresh` skips the age check.
    pub async fn fetch(&self, force_refresh: bool) -> Result<Arc<Rows>> {
        let mut guard = self.entry.lock().await;

        if !force_refresh
            && let Some(entry) = guard.as_ref()
            && entry.is_fresh(self.ttl, Instant::now())
        {
            log::info!("Using cached rows ({} rows)", entry.rows.len());
            return Ok(Arc::clone(&entry.rows));
        }

        log::info!(
            "Fetching rows from {}{}",
            self.source.describe(),
            if force_refresh { " (forced)" } else { "" }
        );
        let rows = match self.source.fetch().await {
            Ok(rows) => Arc::new(rows),
            Err(e) => {
                log::error!("Fetch from {} failed: {:#}", self.source.describe(), e);
                return Err(e);
            }
        };

        *guard = Some(CacheEntry {
            rows: Arc::clone(&rows),
            fetched_at: Instant::now(),
        });
        log::info!("Cached {} rows", rows.len());
        Ok(rows)
    }

    /// Drops the cached entry; the next fetch goes to the source.
    pub async fn invalidate(&self) {
        log::info!("Cache invalidated");
        *self.entry.lock().await = None;
    }

    pub async fn status(&self) -> CacheStatus {
        let guard = self.entry.lock().await;
        let now = Instant::now();
        match guard.as_ref() {
            Some(entry) => CacheStatus {
                is_valid: entry.is_fresh(self.ttl, now),
                age: Some(now.saturating_duration_since(entry.fetched_at)),
                rows_cached: entry.rows.len(),
            },
            None => CacheStatus {
                is_valid: false,
                age: None,
                rows_cached: 0,
            },
        }
    }
}
