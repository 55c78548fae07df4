//! Engine configuration, read from the environment.
//!
//! Every variable is optional. Missing variables take the defaults below;
//! present but unparsable ones are a [`ConfigError`] rather than a silent
//! fallback.

use std::time::Duration;

use url::Url;

/// Default scoring service base URL.
pub const DEFAULT_SCORING_BASE_URL: &str = "http://localhost:8000";

/// Default task name sent with every score request.
pub const DEFAULT_SCORING_TASK: &str = "general_qa";

const DEFAULT_SCORING_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SCORING_MAX_RETRIES: u32 = 1;
const DEFAULT_CHAR_INTERVAL_MS: u64 = 30;
const DEFAULT_MOVE_SETTLE_MS: u64 = 200;
const DEFAULT_ROOM_TRANSITION_MS: u64 = 250;
const DEFAULT_SCORING_FALLBACK_DELAY_MS: u64 = 1500;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid URL in {var}: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Delays driving the session's timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameTiming {
    /// Typewriter reveal, per character
    pub char_interval: Duration,
    /// Lock window after a single step
    pub move_settle: Duration,
    /// Lock window before a room change is applied
    pub room_transition: Duration,
    /// Wait between a failed score request and the simulated result
    pub scoring_fallback: Duration,
}

impl Default for GameTiming {
    fn default() -> Self {
        Self {
            char_interval: Duration::from_millis(DEFAULT_CHAR_INTERVAL_MS),
            move_settle: Duration::from_millis(DEFAULT_MOVE_SETTLE_MS),
            room_transition: Duration::from_millis(DEFAULT_ROOM_TRANSITION_MS),
            scoring_fallback: Duration::from_millis(DEFAULT_SCORING_FALLBACK_DELAY_MS),
        }
    }
}

impl GameTiming {
    /// All delays zero: text appears at once, moves and room changes apply
    /// immediately and the fallback result lands in the same step as the
    /// failure.
    pub fn instant() -> Self {
        Self {
            char_interval: Duration::ZERO,
            move_settle: Duration::ZERO,
            room_transition: Duration::ZERO,
            scoring_fallback: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringConfig {
    pub base_url: Url,
    pub task: String,
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub timing: GameTiming,
}

impl EngineConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, one call per variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = non_empty(&lookup, "SCORING_BASE_URL")
            .unwrap_or_else(|| DEFAULT_SCORING_BASE_URL.to_string());
        let base_url = Url::parse(&raw_url).map_err(|source| ConfigError::InvalidUrl {
            var: "SCORING_BASE_URL",
            source,
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                var: "SCORING_BASE_URL",
                value: base_url.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        let task = non_empty(&lookup, "SCORING_TASK").unwrap_or_else(|| DEFAULT_SCORING_TASK.into());

        let scoring = ScoringConfig {
            base_url,
            task,
            timeout: Duration::from_secs(parse_or(
                &lookup,
                "SCORING_TIMEOUT_SECS",
                DEFAULT_SCORING_TIMEOUT_SECS,
            )?),
            max_retries: parse_or(&lookup, "SCORING_MAX_RETRIES", DEFAULT_SCORING_MAX_RETRIES)?,
        };

        let timing = GameTiming {
            char_interval: millis(&lookup, "DIALOGUE_CHAR_INTERVAL_MS", DEFAULT_CHAR_INTERVAL_MS)?,
            move_settle: millis(&lookup, "MOVE_SETTLE_MS", DEFAULT_MOVE_SETTLE_MS)?,
            room_transition: millis(&lookup, "ROOM_TRANSITION_MS", DEFAULT_ROOM_TRANSITION_MS)?,
            scoring_fallback: millis(
                &lookup,
                "SCORING_FALLBACK_DELAY_MS",
                DEFAULT_SCORING_FALLBACK_DELAY_MS,
            )?,
        };

        Ok(Self { scoring, timing })
    }
}

fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(lookup, var) {
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::InvalidValue {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn millis<F>(lookup: &F, var: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    parse_or(lookup, var, default).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = EngineConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.scoring.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.scoring.task, "general_qa");
        assert_eq!(config.scoring.timeout, Duration::from_secs(10));
        assert_eq!(config.scoring.max_retries, 1);
        assert_eq!(config.timing, GameTiming::default());
        assert_eq!(config.timing.char_interval, Duration::from_millis(30));
        assert_eq!(config.timing.scoring_fallback, Duration::from_millis(1500));
    }

    #[test]
    fn overrides_are_applied() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("SCORING_BASE_URL", "https://scoring.internal:9000/base"),
            ("SCORING_TASK", "math"),
            ("SCORING_MAX_RETRIES", "0"),
            ("MOVE_SETTLE_MS", "0"),
            ("DIALOGUE_CHAR_INTERVAL_MS", " 5 "),
        ]))
        .unwrap();

        assert_eq!(config.scoring.base_url.host_str(), Some("scoring.internal"));
        assert_eq!(config.scoring.task, "math");
        assert_eq!(config.scoring.max_retries, 0);
        assert_eq!(config.timing.move_settle, Duration::ZERO);
        assert_eq!(config.timing.char_interval, Duration::from_millis(5));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = EngineConfig::from_lookup(lookup_from(&[("SCORING_TASK", "   ")])).unwrap();
        assert_eq!(config.scoring.task, DEFAULT_SCORING_TASK);
    }

    #[test]
    fn unparsable_number_is_rejected() {
        let err = EngineConfig::from_lookup(lookup_from(&[("ROOM_TRANSITION_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                var: "ROOM_TRANSITION_MS",
                ..
            }
        ));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err =
            EngineConfig::from_lookup(lookup_from(&[("SCORING_BASE_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let err = EngineConfig::from_lookup(lookup_from(&[("SCORING_BASE_URL", "ftp://example.com")]))
            .unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn instant_timing_is_all_zero() {
        let timing = GameTiming::instant();
        assert!(timing.char_interval.is_zero());
        assert!(timing.move_settle.is_zero());
        assert!(timing.room_transition.is_zero());
        assert!(timing.scoring_fallback.is_zero());
    }
}
