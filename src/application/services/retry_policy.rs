use std::future::Future;
use std::time::Duration;

use crate::application::ports::RecognitionError;

/// Quota exhaustion backs off twice as long as other retryable failures.
const QUOTA_BACKOFF_MULTIPLIER: u32 = 2;

/// Bounded exponential retry for backend calls.
///
/// Only retryable errors re-attempt; the sleep before the k-th retry is
/// `base_delay * 2^(k-1)`. On exhaustion the last error is returned
/// unchanged, kind preserved.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, RecognitionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RecognitionError>>,
    {
        let mut attempt: u32 = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() && attempt < self.max_attempts => {
                    let mut delay = self.base_delay * 2u32.saturating_pow(attempt - 1);
                    if matches!(error, RecognitionError::Quota(_)) {
                        delay *= QUOTA_BACKOFF_MULTIPLIER;
                    }

                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error_kind = error.kind(),
                        delay_ms = delay.as_millis() as u64,
                        "Retrying recognition after error"
                    );

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => {
                    if error.is_retryable() {
                        tracing::error!(
                            attempts = self.max_attempts,
                            error_kind = error.kind(),
                            "Max recognition attempts reached"
                        );
                    } else {
                        tracing::warn!(
                            attempt,
                            error_kind = error.kind(),
                            "Non-retryable recognition error"
                        );
                    }
                    return Err(error);
                }
            }
        }
    }
}
