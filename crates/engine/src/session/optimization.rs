//! Final optimization state.

use chrono::{DateTime, Utc};

use provinggrounds_shared::{
    OptimizationStatus, OptimizationView, ResultSource, ScoreResponse, DEFAULT_BEST_PROMPT,
};

/// Score shown when the scoring service could not be reached.
pub const FALLBACK_SCORE: &str = "96.5";

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub score: String,
    pub best_prompt: String,
    pub source: ResultSource,
    pub completed_at: DateTime<Utc>,
}

impl OptimizationResult {
    pub fn live(response: &ScoreResponse, completed_at: DateTime<Utc>) -> Self {
        Self {
            score: response.score_display(),
            best_prompt: response.best_prompt_display().to_string(),
            source: ResultSource::Live,
            completed_at,
        }
    }

    pub fn fallback(completed_at: DateTime<Utc>) -> Self {
        Self {
            score: FALLBACK_SCORE.to_string(),
            best_prompt: DEFAULT_BEST_PROMPT.to_string(),
            source: ResultSource::Fallback,
            completed_at,
        }
    }
}

/// `Idle -> Pending -> Complete`, with `Failed` covering the wait between a
/// failed request and the simulated result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Optimization {
    status: OptimizationStatus,
    result: Option<OptimizationResult>,
}

impl Optimization {
    pub fn status(&self) -> OptimizationStatus {
        self.status
    }

    pub fn result(&self) -> Option<&OptimizationResult> {
        self.result.as_ref()
    }

    /// Pending or failed-awaiting-fallback: the player is frozen.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.status,
            OptimizationStatus::Pending | OptimizationStatus::Failed
        )
    }

    /// `Idle -> Pending`. Returns false from any other status.
    pub fn begin(&mut self) -> bool {
        if self.status != OptimizationStatus::Idle {
            return false;
        }
        self.status = OptimizationStatus::Pending;
        true
    }

    /// `Pending -> Failed`. Returns false from any other status.
    pub fn fail(&mut self) -> bool {
        if self.status != OptimizationStatus::Pending {
            return false;
        }
        self.status = OptimizationStatus::Failed;
        true
    }

    pub fn complete(&mut self, result: OptimizationResult) {
        self.status = OptimizationStatus::Complete;
        self.result = Some(result);
    }

    pub fn view(&self) -> OptimizationView {
        OptimizationView {
            status: self.status,
            score: self.result.as_ref().map(|r| r.score.clone()),
            best_prompt: self.result.as_ref().map(|r| r.best_prompt.clone()),
            source: self.result.as_ref().map(|r| r.source),
        }
    }
}
