use crate::row::{Dataset, Row};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Fetch a spreadsheet range via the Sheets v4 `values.get` endpoint.
/// The caller supplies an already-authorized access token; token
/// acquisition and refresh live outside the core.
pub struct SheetsClient {
    base_url: String,
    access_token: String,
    client: reqwest::Client,
}

impl SheetsClient {
    pub fn new(access_token: String) -> Self {
        Self::with_base_url(SHEETS_API_BASE.to_string(), access_token)
    }

    pub fn with_base_url(base_url: String, access_token: String) -> Self {
        Self {
            base_url,
            access_token,
            client: reqwest::Client::new(),
        }
    }

    pub async fn fetch_range(&self, sheet_id: &str, range: &str) -> Result<Dataset> {
        let url = format!("{}/{}/values/{}", self.base_url, sheet_id, range);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("Failed to contact the Sheets API")?;

        if !response.status().is_success() {
            anyhow::bail!("Sheets API returned status {}", response.status());
        }

        let value_range: ValueRange = response
            .json()
            .await
            .context("Failed to parse Sheets API response")?;

        Ok(dataset_from_values(value_range.values))
    }
}

/// First row becomes the header; short rows are padded with nulls.
fn dataset_from_values(values: Vec<Vec<String>>) -> Dataset {
    let mut iter = values.into_iter();
    let columns = iter.next().unwrap_or_default();

    let rows = iter
        .map(|cells| {
            let mut record = HashMap::with_capacity(columns.len());
            for (i, column) in columns.iter().enumerate() {
                let value = cells.get(i).filter(|c| !c.is_empty()).cloned();
                record.insert(column.clone(), value);
            }
            Row::new(record)
        })
        .collect();

    Dataset::new(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_row_is_header() {
        let ds = dataset_from_values(vec![
            vec!["name".to_string(), "city".to_string()],
            vec!["Acme".to_string(), "Oslo".to_string()],
            vec!["Globex".to_string()],
        ]);

        assert_eq!(ds.columns, vec!["name", "city"]);
        assert_eq!(ds.rows.len(), 2);
        assert_eq!(ds.rows[0].get("city"), Some("Oslo"));
        // Short row padded with a null
        assert_eq!(ds.rows[1].get("city"), None);
    }

    #[test]
    fn empty_values_mean_empty_dataset() {
        let ds = dataset_from_values(vec![]);
        assert!(ds.columns.is_empty());
        assert!(ds.is_empty());
    }
}
