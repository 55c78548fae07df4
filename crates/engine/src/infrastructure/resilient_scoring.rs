//! Resilient scoring client wrapper with exponential backoff retry
//!
//! Wraps any ScoringPort implementation with retry logic to handle transient
//! failures. Only the final error reaches the session.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use provinggrounds_shared::{ScoreRequest, ScoreResponse};

use crate::infrastructure::ports::{ScoringError, ScoringPort};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 = no retries, just the initial attempt)
    pub max_retries: u32,
    /// Base delay in milliseconds before first retry
    pub base_delay_ms: u64,
    /// Maximum delay in milliseconds (caps exponential growth)
    pub max_delay_ms: u64,
    /// Jitter factor (0.0-1.0) for randomizing delays
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            base_delay_ms: 250,
            max_delay_ms: 2000,
            jitter_factor: 0.2,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Wrapper that adds retry logic to any scoring client
pub struct ResilientScoringClient {
    inner: Arc<dyn ScoringPort>,
    config: RetryConfig,
}

impl ResilientScoringClient {
    pub fn new(inner: Arc<dyn ScoringPort>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Delay before retry `attempt` (1-based): exponential, capped, jittered
    fn calculate_delay(&self, attempt: u32) -> u64 {
        let base = self.config.base_delay_ms;
        let exponential = base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let capped = exponential.min(self.config.max_delay_ms);

        let jitter_range = (capped as f64 * self.config.jitter_factor) as i64;
        if jitter_range > 0 {
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            (capped as i64 + jitter).max(0) as u64
        } else {
            capped
        }
    }
}

#[async_trait]
impl ScoringPort for ResilientScoringClient {
    async fn submit(&self, request: ScoreRequest) -> Result<ScoreResponse, ScoringError> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.inner.submit(request.clone()).await {
                Ok(response) => {
                    if attempt > 0 {
                        tracing::info!(attempt = attempt + 1, "Score request succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(e) => {
                    if !e.is_retryable() {
                        tracing::error!(error = %e, "Score request failed with non-retryable error");
                        return Err(e);
                    }

                    if attempt < self.config.max_retries {
                        let delay = self.calculate_delay(attempt + 1);
                        tracing::warn!(
                            attempt = attempt + 1,
                            max_retries = self.config.max_retries,
                            delay_ms = delay,
                            error = %e,
                            "Score request failed, retrying..."
                        );
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    }

                    last_error = Some(e);
                }
            }
        }

        let error = last_error
            .unwrap_or_else(|| ScoringError::RequestFailed("Unknown error".to_string()));
        tracing::error!(
            attempts = self.config.max_retries + 1,
            error = %error,
            "Score request failed after all retry attempts"
        );
        Err(error)
    }
}
