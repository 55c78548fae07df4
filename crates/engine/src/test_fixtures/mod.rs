//! Common test helpers for building sessions in known situations.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::{at_terminal, run_dialogue_to_close};
//!
//! #[test]
//! fn test_terminal_locked() {
//!     let mut session = at_terminal(2, GameTiming::instant());
//!     // ... test logic
//! }
//! ```

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use provinggrounds_domain::{Direction, GridPos, RoomId, WisdomToken, WorldCatalog};

use crate::config::GameTiming;
use crate::dialogue::AdvanceOutcome;
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::ports::ClockPort;
use crate::session::Session;

// =============================================================================
// Time
// =============================================================================

/// The instant every fixture clock reports.
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 18, 0, 0).unwrap()
}

pub fn fixed_clock() -> Arc<dyn ClockPort> {
    Arc::new(FixedClock(fixed_time()))
}

// =============================================================================
// Sessions
// =============================================================================

/// A fresh session on the shipped catalog.
pub fn new_session(timing: GameTiming) -> Session {
    Session::new(WorldCatalog::shared(), timing, fixed_clock())
}

/// A fresh session placed at `position`.
///
/// # Panics
///
/// Panics if the position is not walkable.
pub fn session_at(room: RoomId, position: GridPos, facing: Direction, timing: GameTiming) -> Session {
    new_session(timing)
        .with_position(room, position, facing)
        .unwrap_or_else(|e| panic!("fixture position is invalid: {e}"))
}

/// Standing in front of the Core terminal holding the first `held` tokens of
/// [`all_tokens`].
pub fn at_terminal(held: usize, timing: GameTiming) -> Session {
    session_at(RoomId::Core, GridPos::new(7, 3), Direction::Up, timing)
        .with_tokens(all_tokens().into_iter().take(held))
}

// =============================================================================
// Wisdom
// =============================================================================

/// Every shipped token, in the order the Masters are usually visited.
pub fn all_tokens() -> Vec<WisdomToken> {
    ["BootstrapFewShot", "MIPRO", "BayesianOptimization"]
        .into_iter()
        .map(WisdomToken::new)
        .collect()
}

// =============================================================================
// Dialogue
// =============================================================================

/// Presses advance until no dialogue is open. Returns how many times a
/// dialogue reported completion.
///
/// # Panics
///
/// Panics if the dialogue does not close within a generous number of presses.
pub fn run_dialogue_to_close(session: &mut Session) -> usize {
    let mut completions = 0;
    for _ in 0..200 {
        if session.active_dialogue().is_none() {
            return completions;
        }
        if session.advance_dialogue().outcome == AdvanceOutcome::Completed {
            completions += 1;
        }
    }
    panic!("dialogue did not close after 200 presses");
}
