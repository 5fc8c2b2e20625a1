use crate::row::Dataset;

/// Generate a textual description of the dataset: one line per column with
/// an example value. Derived once per pipeline run and shared read-only
/// across all concurrent tasks.
pub fn describe(dataset: &Dataset) -> String {
    let mut description = String::from("The dataset contains the following columns:\n");

    for column in &dataset.columns {
        let example = dataset
            .rows
            .iter()
            .find_map(|row| row.get(column))
            .unwrap_or("N/A");
        description.push_str(&format!("- {}: example value '{}'\n", column, example));
    }

    description.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;
    use std::collections::HashMap;

    #[test]
    fn describes_columns_with_examples() {
        let ds = Dataset::new(
            vec!["name".to_string(), "phone".to_string()],
            vec![Row::new(HashMap::from([
                ("name".to_string(), Some("Acme".to_string())),
                ("phone".to_string(), None),
            ]))],
        );

        let text = describe(&ds);
        assert!(text.starts_with("The dataset contains the following columns:"));
        assert!(text.contains("- name: example value 'Acme'"));
        assert!(text.contains("- phone: example value 'N/A'"));
    }

    #[test]
    fn same_dataset_same_description() {
        let ds = Dataset::new(vec!["a".to_string()], vec![]);
        assert_eq!(describe(&ds), describe(&ds));
    }
}
