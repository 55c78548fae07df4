//! HTTP client for the prompt scoring service

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use provinggrounds_shared::{ScoreRequest, ScoreResponse};

use crate::config::ScoringConfig;
use crate::infrastructure::ports::{ScoringError, ScoringPort};

/// Client for the scoring service's optimize endpoint
#[derive(Clone)]
pub struct HttpScoringClient {
    client: Client,
    base_url: String,
}

impl HttpScoringClient {
    pub fn new(base_url: &Url, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(&config.base_url, config.timeout)
    }

    fn endpoint(&self) -> String {
        format!("{}/api/optimize", self.base_url)
    }
}

#[async_trait]
impl ScoringPort for HttpScoringClient {
    async fn submit(&self, request: ScoreRequest) -> Result<ScoreResponse, ScoringError> {
        let url = self.endpoint();
        tracing::debug!(%url, prompts = request.prompts.len(), "Submitting score request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScoringError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| ScoringError::RequestFailed(e.to_string()))?;
            return Err(ScoringError::status(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| ScoringError::InvalidResponse(e.to_string()))
    }
}
