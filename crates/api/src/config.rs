use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SerpApi key, from SERPAPI_KEY.
    pub serpapi_key: String,
    /// Groq key, from GROQ_API_KEY.
    pub groq_api_key: String,
    pub llm: LlmConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub retry_max_attempts: usize,
    pub retry_backoff_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub concurrency: usize,
    pub search_result_count: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.2-1b-preview".to_string(),
            retry_max_attempts: 8,
            retry_backoff_secs: 60,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: pipeline::DEFAULT_CONCURRENCY,
            search_result_count: 10,
        }
    }
}

impl AppConfig {
    /// The two provider secrets come from the process environment; the rest
    /// has defaults.
    pub fn from_env() -> Result<Self> {
        let serpapi_key =
            std::env::var("SERPAPI_KEY").context("SERPAPI_KEY is not set in the environment")?;
        let groq_api_key =
            std::env::var("GROQ_API_KEY").context("GROQ_API_KEY is not set in the environment")?;

        let mut llm = LlmConfig::default();
        if let Ok(model) = std::env::var("GROQ_MODEL") {
            llm.model = model;
        }

        Ok(Self {
            serpapi_key,
            groq_api_key,
            llm,
            pipeline: PipelineConfig::default(),
        })
    }
}
