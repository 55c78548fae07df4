//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - The scoring service (could swap the HTTP service for a local model)
//! - Clock (for testing)

mod error;
mod external;
mod testing;

pub use error::ScoringError;
pub use external::ScoringPort;
pub use testing::ClockPort;

#[cfg(test)]
pub use external::MockScoringPort;
#[cfg(test)]
pub use testing::MockClockPort;
