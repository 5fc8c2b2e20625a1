mod config;
mod runs;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use config::AppConfig;
use dataset::{Dataset, SheetsClient};
use extract::{Extractor, GroqClient, RetryPolicy};
use pipeline::{QueryBuilder, RunConfig};
use runs::{RunHandle, RunState};
use search::SerpClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

#[derive(Clone)]
struct AppState {
    config: AppConfig,
    datasets: Arc<dashmap::DashMap<Uuid, Dataset>>,
    runs: Arc<dashmap::DashMap<Uuid, Arc<RunHandle>>>,
}

#[derive(Serialize)]
struct DatasetResponse {
    id: Uuid,
    columns: Vec<String>,
    rows: usize,
    description: String,
}

#[derive(Deserialize)]
struct SheetRequest {
    sheet_id: String,
    range: String,
    access_token: String,
}

#[derive(Deserialize)]
struct RunRequest {
    dataset_id: Uuid,
    entity_column: String,
    information_type: String,
    template: String,
}

#[derive(Serialize)]
struct RunResponse {
    run_id: Uuid,
}

#[derive(Serialize)]
struct RunStatus {
    state: RunState,
    progress: f32,
    completed: usize,
    total: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;

    let state = AppState {
        config,
        datasets: Arc::new(dashmap::DashMap::new()),
        runs: Arc::new(dashmap::DashMap::new()),
    };

    let app = Router::new()
        .route("/datasets", post(upload_dataset))
        .route("/datasets/sheet", post(fetch_sheet))
        .route("/runs", post(start_run))
        .route("/runs/:id", get(run_status))
        .route("/runs/:id/download", get(download_run))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("Server listening on http://localhost:3000");
    axum::serve(listener, app).await?;

    Ok(())
}

fn dataset_response(dataset: &Dataset) -> DatasetResponse {
    DatasetResponse {
        id: dataset.id,
        columns: dataset.columns.clone(),
        rows: dataset.rows.len(),
        description: dataset::describe(dataset),
    }
}

/// CSV upload: the request body is the file content.
async fn upload_dataset(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<DatasetResponse>, (StatusCode, String)> {
    let dataset = dataset::from_csv(body.as_bytes())
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let response = dataset_response(&dataset);
    state.datasets.insert(dataset.id, dataset);
    Ok(Json(response))
}

async fn fetch_sheet(
    State(state): State<AppState>,
    Json(req): Json<SheetRequest>,
) -> Result<Json<DatasetResponse>, (StatusCode, String)> {
    let client = SheetsClient::new(req.access_token);
    let dataset = client
        .fetch_range(&req.sheet_id, &req.range)
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))?;

    let response = dataset_response(&dataset);
    state.datasets.insert(dataset.id, dataset);
    Ok(Json(response))
}

/// Validate everything up front, then hand the whole run to a background
/// task. Failures past this point are per-entity values in the table, not
/// HTTP errors.
async fn start_run(
    State(state): State<AppState>,
    Json(req): Json<RunRequest>,
) -> Result<Json<RunResponse>, (StatusCode, String)> {
    pipeline::validate_template(&req.template)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let dataset = state
        .datasets
        .get(&req.dataset_id)
        .ok_or((StatusCode::NOT_FOUND, "unknown dataset".to_string()))?;

    let entities = dataset
        .entities(&req.entity_column)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let description = dataset::describe(&dataset);
    drop(dataset);

    let run_id = Uuid::new_v4();
    let handle = Arc::new(RunHandle::new());
    state.runs.insert(run_id, Arc::clone(&handle));

    let config = state.config.clone();
    let mut run_config = RunConfig::new(req.information_type, req.template);
    run_config.concurrency = config.pipeline.concurrency;

    tokio::spawn(async move {
        tracing::info!(%run_id, entities = entities.len(), "pipeline run started");

        let provider = SerpClient::new(config.serpapi_key.clone())
            .result_count(config.pipeline.search_result_count);
        let llm = GroqClient::new(config.groq_api_key.clone()).model(config.llm.model.clone());
        let extractor = Extractor::new(
            llm,
            RetryPolicy::new(
                config.llm.retry_max_attempts,
                Duration::from_secs(config.llm.retry_backoff_secs),
            ),
        );

        // Template already validated in the handler; a hard stop here
        // covers the impossible path without panicking the task.
        let queries = match QueryBuilder::new(
            &run_config.information_type,
            &run_config.template,
            &description,
        ) {
            Ok(queries) => queries,
            Err(e) => {
                tracing::error!(%run_id, error = %e, "template rejected");
                handle.set_state(RunState::Failed).await;
                return;
            }
        };

        let search_results = pipeline::run_search_stage(
            &entities,
            &queries,
            &provider,
            run_config.concurrency,
            &handle.progress,
        )
        .await;

        handle.set_state(RunState::Extracting).await;

        let table = pipeline::run_extract_stage(
            &search_results,
            &queries,
            &extractor,
            run_config.concurrency,
            &handle.progress,
        )
        .await;

        tracing::info!(%run_id, rows = table.len(), "pipeline run finished");
        handle.finish(table).await;
    });

    Ok(Json(RunResponse { run_id }))
}

async fn run_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RunStatus>, StatusCode> {
    let handle = state.runs.get(&id).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(RunStatus {
        state: handle.state().await,
        progress: handle.progress.fraction(),
        completed: handle.progress.completed(),
        total: handle.progress.total(),
    }))
}

async fn download_run(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let handle = state
        .runs
        .get(&id)
        .ok_or((StatusCode::NOT_FOUND, "unknown run".to_string()))?;

    let table = handle
        .table()
        .await
        .ok_or((StatusCode::CONFLICT, "run is still in progress".to_string()))?;

    let bytes = pipeline::export_csv(&table)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"extracted_data.csv\"".to_string(),
            ),
        ],
        bytes,
    ))
}
