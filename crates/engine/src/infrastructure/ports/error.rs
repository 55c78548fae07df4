//! Error types for port operations.

/// Scoring request failures. All of them are recoverable: the session falls
/// back to a simulated result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    /// Connection, timeout or other transport failure.
    #[error("Scoring request failed: {0}")]
    RequestFailed(String),

    /// The service answered with a non-success status.
    #[error("Scoring service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The body could not be decoded.
    #[error("Invalid scoring response: {0}")]
    InvalidResponse(String),
}

impl ScoringError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Transport failures and server-side statuses may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::InvalidResponse(_) => false,
        }
    }
}
