use crate::llm::LlmError;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

const DEFAULT_MAX_ATTEMPTS: usize = 8;
const DEFAULT_BACKOFF: Duration = Duration::from_secs(60);

/// Retry discipline for rate-limited completion calls: sleep a fixed
/// backoff and try again, up to a finite attempt cap. Any error other than
/// a rate limit fails the call immediately.
pub struct RetryPolicy {
    max_attempts: usize,
    backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub async fn run<F, Fut, T>(&self, operation: &str, mut f: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, LlmError>>,
    {
        let mut attempt = 1;

        loop {
            match f().await {
                Ok(result) => {
                    if attempt > 1 {
                        info!(operation, attempts = attempt, "succeeded after backoff");
                    }
                    return Ok(result);
                }
                Err(LlmError::RateLimited) if attempt < self.max_attempts => {
                    warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        backoff_secs = self.backoff.as_secs(),
                        "rate limited, backing off"
                    );
                    sleep(self.backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(operation, attempt, error = %e, "giving up");
                    return Err(e);
                }
            }
        }
    }
}
