use crate::progress::Progress;
use crate::query::QueryBuilder;
use extract::{CompletionClient, Extractor};
use futures::{StreamExt, stream};
use indexmap::IndexMap;
use search::{SearchOutcome, SearchProvider};
use tracing::warn;

/// Entity -> search outcome, in completion order. Duplicate entities keep
/// their first position; the later completion overwrites the value.
pub type SearchResults = IndexMap<String, SearchOutcome>;

/// Entity -> extracted text (or error-describing string), completion order.
pub type ResultTable = IndexMap<String, String>;

/// Fan out one search call per entity over a bounded pool. Provider
/// failures become error strings in the map; they never touch sibling
/// tasks. The map is only written from the collection loop below.
pub async fn run_search_stage<P: SearchProvider>(
    entities: &[String],
    queries: &QueryBuilder,
    provider: &P,
    width: usize,
    progress: &Progress,
) -> SearchResults {
    let mut results = SearchResults::new();
    if entities.is_empty() {
        return results;
    }
    progress.begin_stage(entities.len());

    let tasks = entities.iter().cloned().map(|entity| async move {
        let query = queries.build(&entity);
        let outcome = match provider.search(&query).await {
            Ok(hits) => SearchOutcome::Hits(hits),
            Err(e) => {
                warn!(entity, error = %e, "search failed");
                SearchOutcome::Failed(format!("Error occurred: {}", e))
            }
        };
        (entity, outcome)
    });

    let mut completions = stream::iter(tasks).buffer_unordered(width);
    while let Some((entity, outcome)) = completions.next().await {
        results.insert(entity, outcome);
        progress.tick();
    }

    results
}

/// Fan out one completion call per entity over the search stage's output.
/// The search results (or the search error string) are appended to the
/// query as the prompt context. Rate limits are retried inside the
/// extractor; every other failure becomes this entity's result value.
pub async fn run_extract_stage<C: CompletionClient>(
    search_results: &SearchResults,
    queries: &QueryBuilder,
    extractor: &Extractor<C>,
    width: usize,
    progress: &Progress,
) -> ResultTable {
    let mut table = ResultTable::new();
    if search_results.is_empty() {
        return table;
    }
    progress.begin_stage(search_results.len());

    let tasks: Vec<_> = search_results
        .iter()
        .map(|(entity, outcome)| extract_one(entity, outcome, queries, extractor))
        .collect();

    let mut completions = stream::iter(tasks).buffer_unordered(width);
    while let Some((entity, value)) = completions.next().await {
        table.insert(entity, value);
        progress.tick();
    }

    table
}

async fn extract_one<C: CompletionClient>(
    entity: &String,
    outcome: &SearchOutcome,
    queries: &QueryBuilder,
    extractor: &Extractor<C>,
) -> (String, String) {
    let prompt = format!(
        "{}\n\nWeb Results:\n{}",
        queries.build(entity),
        outcome.as_text_block()
    );
    let value = match extractor.extract(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!(entity, error = %e, "extraction failed");
            format!("Error extracting information: {}", e)
        }
    };
    (entity.clone(), value)
}
