use thiserror::Error;

/// Malformed query template. Fatal to the whole run; surfaced once before
/// any fan-out begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("query template is missing the {{entity}} placeholder")]
    MissingEntity,

    #[error("query template is missing the {{information}} placeholder")]
    MissingInformation,
}

pub fn validate_template(template: &str) -> Result<(), TemplateError> {
    if !template.contains("{entity}") {
        return Err(TemplateError::MissingEntity);
    }
    if !template.contains("{information}") {
        return Err(TemplateError::MissingInformation);
    }
    Ok(())
}

/// Validated template plus the run-wide strings, so per-task query building
/// is infallible. Validate once, not per task.
pub struct QueryBuilder {
    information_type: String,
    template: String,
    description: String,
}

impl QueryBuilder {
    pub fn new(
        information_type: &str,
        template: &str,
        description: &str,
    ) -> Result<Self, TemplateError> {
        validate_template(template)?;
        Ok(Self {
            information_type: information_type.to_string(),
            template: template.to_string(),
            description: description.to_string(),
        })
    }

    /// Dataset description, a blank line, then the filled template.
    pub fn build(&self, entity: &str) -> String {
        let filled = self
            .template
            .replace("{entity}", entity)
            .replace("{information}", &self.information_type);
        format!("{}\n\n{}", self.description, filled)
    }
}

/// One-shot form of the same contract; deterministic and side-effect free.
pub fn build_query(
    entity: &str,
    information_type: &str,
    template: &str,
    description: &str,
) -> Result<String, TemplateError> {
    Ok(QueryBuilder::new(information_type, template, description)?.build(entity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_description_then_filled_template() {
        let query = build_query(
            "Acme",
            "email",
            "Get the {information} of {entity}.",
            "Columns: name",
        )
        .unwrap();

        assert_eq!(query, "Columns: name\n\nGet the email of Acme.");
    }

    #[test]
    fn missing_entity_placeholder_fails() {
        let err = build_query("Acme", "email", "Get the {information}.", "d").unwrap_err();
        assert_eq!(err, TemplateError::MissingEntity);
    }

    #[test]
    fn missing_information_placeholder_fails() {
        let err = build_query("Acme", "email", "Look up {entity}.", "d").unwrap_err();
        assert_eq!(err, TemplateError::MissingInformation);
    }

    #[test]
    fn identical_inputs_identical_output() {
        let a = build_query("Acme", "phone", "{information} for {entity}", "desc").unwrap();
        let b = build_query("Acme", "phone", "{information} for {entity}", "desc").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn repeated_placeholders_all_substituted() {
        let query = build_query("Acme", "email", "{entity} {entity} {information}", "d").unwrap();
        assert_eq!(query, "d\n\nAcme Acme email");
    }
}
