//! External service port traits.

use async_trait::async_trait;

use provinggrounds_shared::{ScoreRequest, ScoreResponse};

use super::error::ScoringError;

/// Submits collected wisdom tokens for the final optimization score.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoringPort: Send + Sync {
    async fn submit(&self, request: ScoreRequest) -> Result<ScoreResponse, ScoringError>;
}
