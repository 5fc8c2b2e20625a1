pub mod export;
pub mod progress;
pub mod query;
pub mod stages;

pub use export::export_csv;
pub use progress::Progress;
pub use query::{QueryBuilder, TemplateError, build_query, validate_template};
pub use stages::{ResultTable, SearchResults, run_extract_stage, run_search_stage};

use extract::{CompletionClient, Extractor};
use search::SearchProvider;

pub const DEFAULT_CONCURRENCY: usize = 10;

/// Per-run knobs supplied by the caller.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub information_type: String,
    pub template: String,
    pub concurrency: usize,
}

impl RunConfig {
    pub fn new(information_type: String, template: String) -> Self {
        Self {
            information_type,
            template,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Whole pipeline in one call: validate the template, drain the search
/// stage, then run extraction over its output. The search stage completes
/// fully before the first completion call goes out; the stages do not
/// overlap.
pub async fn run_pipeline<P: SearchProvider, C: CompletionClient>(
    entities: &[String],
    description: &str,
    config: &RunConfig,
    provider: &P,
    extractor: &Extractor<C>,
    progress: &Progress,
) -> Result<ResultTable, TemplateError> {
    let queries = QueryBuilder::new(&config.information_type, &config.template, description)?;

    let search_results =
        run_search_stage(entities, &queries, provider, config.concurrency, progress).await;

    Ok(run_extract_stage(&search_results, &queries, extractor, config.concurrency, progress).await)
}
