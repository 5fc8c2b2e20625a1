use crate::row::{Dataset, Row};
use anyhow::{Context, Result};
use std::collections::HashMap;

/// Parse an uploaded CSV (first row = headers) into a `Dataset`.
pub fn from_csv(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to read CSV record")?;

        let mut values = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let cell = record.get(i).unwrap_or("");
            let value = if cell.is_empty() {
                None
            } else {
                Some(cell.to_string())
            };
            values.insert(column.clone(), value);
        }
        rows.push(Row::new(values));
    }

    Ok(Dataset::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headers_and_rows() {
        let csv = b"name,email\nAcme,hi@acme.com\nGlobex,\n";
        let ds = from_csv(csv).unwrap();

        assert_eq!(ds.columns, vec!["name", "email"]);
        assert_eq!(ds.rows.len(), 2);
        assert_eq!(ds.rows[0].get("email"), Some("hi@acme.com"));
        assert_eq!(ds.rows[1].get("email"), None);
    }

    #[test]
    fn handles_quoted_cells() {
        let csv = b"name,notes\n\"Acme, Inc\",\"line1\nline2\"\n";
        let ds = from_csv(csv).unwrap();

        assert_eq!(ds.rows[0].get("name"), Some("Acme, Inc"));
        assert_eq!(ds.rows[0].get("notes"), Some("line1\nline2"));
    }
}
