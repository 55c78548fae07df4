//! Wisdom tokens - the collectibles that unlock the Core terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a collectible piece of wisdom.
///
/// Serializes as a bare string so a held set can be sent to the scoring
/// service as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WisdomToken(String);

impl WisdomToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WisdomToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WisdomToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
