use crate::{SearchError, SearchHit, SearchProvider};
use async_trait::async_trait;
use serde::Deserialize;

const SERPAPI_URL: &str = "https://serpapi.com/search";
const DEFAULT_RESULT_COUNT: usize = 10;

#[derive(Deserialize)]
struct SerpResponse {
    // Absent when the query produced no organic results; that is a valid
    // empty outcome, not a decode failure.
    #[serde(default)]
    organic_results: Option<Vec<SearchHit>>,
}

/// SerpApi-style web search client: one GET per query with `q`, `api_key`
/// and `num` parameters.
#[derive(Clone)]
pub struct SerpClient {
    base_url: String,
    api_key: String,
    result_count: usize,
    client: reqwest::Client,
}

impl SerpClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(SERPAPI_URL.to_string(), api_key)
    }

    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        Self {
            base_url,
            api_key,
            result_count: DEFAULT_RESULT_COUNT,
            client: reqwest::Client::new(),
        }
    }

    pub fn result_count(mut self, count: usize) -> Self {
        self.result_count = count;
        self
    }
}

#[async_trait]
impl SearchProvider for SerpClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let num = self.result_count.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let body = response.text().await?;
        let parsed: SerpResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::Malformed(e.to_string()))?;

        tracing::debug!(
            query,
            hits = parsed.organic_results.as_ref().map_or(0, |h| h.len()),
            "search completed"
        );

        Ok(parsed.organic_results.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_organic_results() {
        let body = r#"{"organic_results":[{"title":"Acme","link":"https://acme.com","snippet":"s"}],"search_metadata":{}}"#;
        let parsed: SerpResponse = serde_json::from_str(body).unwrap();
        let hits = parsed.organic_results.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title.as_deref(), Some("Acme"));
    }

    #[test]
    fn missing_organic_results_is_empty_not_error() {
        let body = r#"{"search_metadata":{"status":"Success"}}"#;
        let parsed: SerpResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.organic_results.is_none());
    }
}
