// File: ./src/source/mod.rs
//! Row sources: the only place the pipeline talks to the outside world.
//!
//! A source returns the whole sheet as rows of cells, header first. It owns its
//! own I/O deadlines; the cache above it only decides *when* to call it.
pub mod file;
pub mod sheets;

use crate::config::SourceConfig;
use anyhow::{Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;

pub use file::JsonFileSource;
pub use sheets::SheetsSource;

/// Header row followed by data rows.
pub type Rows = Vec<Vec<String>>;

pub trait RowSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Rows>> + Send;

    /// Short human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// Source selected from configuration.
#[derive(Debug, Clone)]
pub enum AnySource {
    File(JsonFileSource),
    Sheets(SheetsSource),
}

impl AnySource {
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        match config {
            SourceConfig::File { path } => Ok(Self::File(JsonFileSource::new(path.clone()))),
            SourceConfig::Sheets {
                sheet_id,
                tab,
                api_key,
                access_token,
                base_url,
            } => Ok(Self::Sheets(SheetsSource::new(
                base_url,
                sheet_id,
                tab,
                api_key.clone(),
                access_token.clone(),
            )?)),
        }
    }
}

impl RowSource for AnySource {
    async fn fetch(&self) -> Result<Rows> {
        match self {
            AnySource::File(s) => s.fetch().await,
            AnySource::Sheets(s) => s.fetch().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            AnySource::File(s) => s.describe(),
            AnySource::Sheets(s) => s.describe(),
        }
    }
}

/// Accepted JSON payloads: a bare array of rows, or a values-API response.
#[derive(Deserialize)]
#[serde(untagged)]
enum RowsPayload {
    Bare(Vec<Vec<Value>>),
    ValueRange {
        #[serde(default)]
        values: Vec<Vec<Value>>,
    },
}

/// Decodes a JSON document into rows of strings.
/// Nulls become empty cells; numbers and booleans keep their JSON spelling.
pub fn rows_from_json(text: &str) -> Result<Rows> {
    let payload: RowsPayload =
        serde_json::from_str(text).map_err(|e| anyhow!("Invalid rows payload: {}", e))?;
    let raw = match payload {
        RowsPayload::Bare(rows) => rows,
        RowsPayload::ValueRange { values } => values,
    };
    Ok(raw
        .into_iter()
        .map(|row| row.into_iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_rows() {
        let rows = rows_from_json(r#"[["STT","Name"],["1", "Alice", 45292, null, true]]"#).unwrap();
        assert_eq!(rows[0], vec!["STT", "Name"]);
        assert_eq!(rows[1], vec!["1", "Alice", "45292", "", "true"]);
    }

    #[test]
    fn test_value_range() {
        let rows = rows_from_json(
            r#"{"range":"Sheet1!A1:H3","majorDimension":"ROWS","values":[["h"],["1","Bob"]]}"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1], "Bob");
    }

    #[test]
    fn test_empty_value_range() {
        // The values API omits `values` for an empty range.
        let rows = rows_from_json(r#"{"range":"Sheet1!A1:H1"}"#).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_invalid_payload() {
        assert!(rows_from_json("not json").is_err());
        assert!(rows_from_json(r#"{"values": 3}"#).is_err());
    }
}
