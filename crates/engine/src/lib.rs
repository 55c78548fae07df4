//! Proving Grounds Engine library.
//!
//! Everything between the static world catalog and a render surface.
//!
//! ## Structure
//!
//! - `session/` - The synchronous game state machine (movement, dialogue routing, wisdom, terminal)
//! - `dialogue` - Typewriter dialogue sequences
//! - `effects` - Timer and scoring effects the session hands to its runtime
//! - `runtime` - Tokio actor driving a session and publishing frames
//! - `render` - ASCII render surface
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `config` - Environment configuration
//! - `app` - Application composition

pub mod app;
pub mod config;
pub mod dialogue;
pub mod effects;
pub mod infrastructure;
pub mod render;
pub mod runtime;
pub mod session;

/// Common helpers for session tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
