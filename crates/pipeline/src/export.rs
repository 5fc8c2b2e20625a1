use crate::stages::ResultTable;
use anyhow::{Context, Result};

/// Encode the result table as UTF-8 CSV in its current iteration order
/// (completion order of the extraction stage). No validation of the values:
/// error strings are exported as literal cells.
pub fn export_csv(table: &ResultTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["Entity", "Extracted Information"])
        .context("Failed to write CSV header")?;

    for (entity, value) in table {
        writer
            .write_record([entity, value])
            .context("Failed to write CSV row")?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn round_trip(table: &ResultTable) -> Vec<(String, String)> {
        let bytes = export_csv(table).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        assert_eq!(
            reader.headers().unwrap(),
            &csv::StringRecord::from(vec!["Entity", "Extracted Information"])
        );
        reader
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[0].to_string(), r[1].to_string())
            })
            .collect()
    }

    #[test]
    fn exports_rows_in_table_order() {
        let mut table = IndexMap::new();
        table.insert("Globex".to_string(), "ops@globex.com".to_string());
        table.insert("Acme".to_string(), "no-data".to_string());

        let rows = round_trip(&table);
        assert_eq!(
            rows,
            vec![
                ("Globex".to_string(), "ops@globex.com".to_string()),
                ("Acme".to_string(), "no-data".to_string()),
            ]
        );
    }

    #[test]
    fn quotes_embedded_commas_and_newlines() {
        let mut table = IndexMap::new();
        table.insert(
            "Acme, Inc".to_string(),
            "line one\nline two, with comma".to_string(),
        );

        let rows = round_trip(&table);
        assert_eq!(rows[0].0, "Acme, Inc");
        assert_eq!(rows[0].1, "line one\nline two, with comma");
    }

    #[test]
    fn error_strings_export_as_literal_cells() {
        let mut table = IndexMap::new();
        table.insert(
            "Acme".to_string(),
            "Error extracting information: rate limit exceeded".to_string(),
        );

        let rows = round_trip(&table);
        assert_eq!(
            rows[0].1,
            "Error extracting information: rate limit exceeded"
        );
    }

    #[test]
    fn empty_table_is_header_only() {
        let table = IndexMap::new();
        assert!(round_trip(&table).is_empty());
    }
}
