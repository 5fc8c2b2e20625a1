pub mod llm;
pub mod retry;

pub use llm::{CompletionClient, GroqClient, LlmError};
pub use retry::RetryPolicy;

/// Completion client plus retry discipline. One `extract` call resolves a
/// single prompt to text, absorbing rate limits along the way.
pub struct Extractor<C> {
    client: C,
    policy: RetryPolicy,
}

impl<C: CompletionClient> Extractor<C> {
    pub fn new(client: C, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub async fn extract(&self, prompt: &str) -> Result<String, LlmError> {
        self.policy
            .run("chat completion", || self.client.complete(prompt))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FlakyClient {
        rate_limited_calls: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionClient for FlakyClient {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.rate_limited_calls {
                Err(LlmError::RateLimited)
            } else {
                Ok("extracted".to_string())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn extractor_absorbs_rate_limits() {
        let client = FlakyClient {
            rate_limited_calls: 2,
            calls: AtomicUsize::new(0),
        };
        let extractor = Extractor::new(client, RetryPolicy::new(5, Duration::from_secs(60)));

        let text = extractor.extract("prompt").await.unwrap();
        assert_eq!(text, "extracted");
    }
}
