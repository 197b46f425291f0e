// File: ./src/source/sheets.rs
// Google Sheets values API (v4) reader.
//
// GET {base}/{sheet_id}/values/{tab}?key=...&valueRenderOption=FORMATTED_VALUE
//
// Trailing empty cells are omitted by the API; the parser pads rows, so this
// module passes them through untouched.
use crate::source::{RowSource, Rows, rows_from_json};
use anyhow::{Context, Result, anyhow, bail};
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct SheetsSource {
    client: reqwest::Client,
    url: Url,
    api_key: Option<String>,
    access_token: Option<String>,
    tab: String,
}

impl SheetsSource {
    pub fn new(
        base_url: &str,
        sheet_id: &str,
        tab: &str,
        api_key: Option<String>,
        access_token: Option<String>,
    ) -> Result<Self> {
        if sheet_id.trim().is_empty() {
            bail!("Sheet id is empty");
        }
        let mut url =
            Url::parse(base_url).with_context(|| format!("Invalid base url '{}'", base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Base url '{}' cannot carry a path", base_url))?
            .pop_if_empty()
            .push(sheet_id)
            .push("values")
            .push(tab);

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url,
            api_key,
            access_token,
            tab: tab.to_string(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl RowSource for SheetsSource {
    async fn fetch(&self) -> Result<Rows> {
        let mut request = self
            .client
            .get(self.url.clone())
            .query(&[("valueRenderOption", "FORMATTED_VALUE")]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        log::info!("Fetching rows from sheet tab '{}'", self.tab);
        let response = request
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.describe()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Sheets API returned {}: {}", status, body.trim());
        }

        let body = response
            .text()
            .await
            .context("Failed to read Sheets API response")?;
        let rows = rows_from_json(&body)?;
        log::info!("Fetched {} rows from sheet tab '{}'", rows.len(), self.tab);
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("sheet tab '{}'", self.tab)
    }
}
