pub mod client;

pub use client::SerpClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search API returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed search response: {0}")]
    Malformed(String),
}

/// One result record from the search provider. The common fields are typed;
/// anything else the provider sends is kept in `extra` so it still reaches
/// the extraction prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SearchHit {
    /// Flatten the hit into a single text line for the extraction prompt.
    pub fn render(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Per-entity search outcome. Failures are data: the error string is stored
/// in place of the hits and flows through to the final table.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Hits(Vec<SearchHit>),
    Failed(String),
}

impl SearchOutcome {
    /// Serialize into the flat textual block handed to the extraction stage,
    /// one line per hit.
    pub fn as_text_block(&self) -> String {
        match self {
            SearchOutcome::Hits(hits) => hits
                .iter()
                .map(SearchHit::render)
                .collect::<Vec<_>>()
                .join("\n"),
            SearchOutcome::Failed(message) => message.clone(),
        }
    }
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_keeps_extra_fields() {
        let hit: SearchHit = serde_json::from_str(
            r#"{"title":"Acme","link":"https://acme.com","snippet":"hi","position":1}"#,
        )
        .unwrap();

        let line = hit.render();
        assert!(line.contains("\"title\":\"Acme\""));
        assert!(line.contains("\"position\":1"));
    }

    #[test]
    fn text_block_joins_hits_line_wise() {
        let hits = vec![
            SearchHit {
                title: Some("a".to_string()),
                link: None,
                snippet: None,
                extra: Default::default(),
            },
            SearchHit {
                title: Some("b".to_string()),
                link: None,
                snippet: None,
                extra: Default::default(),
            },
        ];

        let block = SearchOutcome::Hits(hits).as_text_block();
        assert_eq!(block.lines().count(), 2);
    }
}
