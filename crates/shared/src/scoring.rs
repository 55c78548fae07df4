//! Scoring service wire format.
//!
//! `POST /api/optimize` with the held wisdom tokens. The service answers with
//! a loosely typed object; only `score` is looked at, and even that may be
//! absent. `best_prompt` is informational and never fails a decode.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use provinggrounds_domain::WisdomToken;

/// Shown when the service omits `score`.
pub const DEFAULT_SCORE_DISPLAY: &str = "95.2";

/// Shown when the service omits `best_prompt`.
pub const DEFAULT_BEST_PROMPT: &str = "Combination of all wisdom";

/// Request body for the optimization endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub prompts: Vec<WisdomToken>,
    pub task: String,
}

impl ScoreRequest {
    pub fn new(prompts: Vec<WisdomToken>, task: impl Into<String>) -> Self {
        Self {
            prompts,
            task: task.into(),
        }
    }
}

/// A score as the service sends it: a number or an already formatted string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Success body of the optimization endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreValue>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub best_prompt: Option<String>,
}

/// Strings pass through; null, `false` and `""` count as absent; anything
/// else is kept as its JSON text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

impl ScoreResponse {
    /// Score to display, substituting the default when absent.
    pub fn score_display(&self) -> String {
        match &self.score {
            Some(score) => score.to_string(),
            None => DEFAULT_SCORE_DISPLAY.to_string(),
        }
    }

    pub fn best_prompt_display(&self) -> &str {
        self.best_prompt.as_deref().unwrap_or(DEFAULT_BEST_PROMPT)
    }
}
