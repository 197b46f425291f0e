// File: ./src/source/file.rs
use crate::source::{RowSource, Rows, rows_from_json};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Reads rows from a JSON export on disk. The file is re-read on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl RowSource for JsonFileSource {
    async fn fetch(&self) -> Result<Rows> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read rows file '{}'", self.path.display()))?;
        let rows = rows_from_json(&contents)
            .with_context(|| format!("Failed to parse rows file '{}'", self.path.display()))?;
        log::info!("Read {} rows from '{}'", rows.len(), self.path.display());
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
