use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One record from the source table. Values are keyed by column name;
/// empty cells are `None`. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    values: HashMap<String, Option<String>>,
}

impl Row {
    pub fn new(values: HashMap<String, Option<String>>) -> Self {
        Self { values }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).and_then(|v| v.as_deref())
    }
}

/// A loaded table snapshot. Column order is preserved from the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub id: Uuid,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            id: Uuid::new_v4(),
            columns,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ordered values of the designated entity column. Null cells are
    /// filtered out here; duplicates are kept and collapse later at
    /// aggregation.
    pub fn entities(&self, column: &str) -> anyhow::Result<Vec<String>> {
        if !self.columns.iter().any(|c| c == column) {
            anyhow::bail!("No column named '{}' in the dataset", column);
        }

        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.get(column).map(|v| v.to_string()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let columns = vec!["name".to_string(), "city".to_string()];
        let rows = vec![
            Row::new(HashMap::from([
                ("name".to_string(), Some("Acme".to_string())),
                ("city".to_string(), None),
            ])),
            Row::new(HashMap::from([
                ("name".to_string(), None),
                ("city".to_string(), Some("Oslo".to_string())),
            ])),
            Row::new(HashMap::from([
                ("name".to_string(), Some("Globex".to_string())),
                ("city".to_string(), Some("Berlin".to_string())),
            ])),
        ];
        Dataset::new(columns, rows)
    }

    #[test]
    fn entities_skip_null_cells() {
        let ds = sample();
        assert_eq!(ds.entities("name").unwrap(), vec!["Acme", "Globex"]);
    }

    #[test]
    fn entities_unknown_column_fails() {
        let ds = sample();
        assert!(ds.entities("email").is_err());
    }
}
