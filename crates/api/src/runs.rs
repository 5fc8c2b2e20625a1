use pipeline::{Progress, ResultTable};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Searching,
    Extracting,
    Done,
    Failed,
}

/// Shared view of one in-progress pipeline run. The spawned task writes
/// state transitions and the final table; handlers only read.
pub struct RunHandle {
    pub progress: Arc<Progress>,
    state: RwLock<RunState>,
    table: RwLock<Option<ResultTable>>,
}

impl RunHandle {
    pub fn new() -> Self {
        Self {
            progress: Arc::new(Progress::new()),
            state: RwLock::new(RunState::Searching),
            table: RwLock::new(None),
        }
    }

    pub async fn state(&self) -> RunState {
        *self.state.read().await
    }

    pub async fn set_state(&self, state: RunState) {
        *self.state.write().await = state;
    }

    pub async fn finish(&self, table: ResultTable) {
        *self.table.write().await = Some(table);
        self.set_state(RunState::Done).await;
    }

    pub async fn table(&self) -> Option<ResultTable> {
        self.table.read().await.clone()
    }
}
