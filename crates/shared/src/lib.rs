//! Proving Grounds Shared - contracts between the engine and its collaborators
//!
//! - Scoring service wire format (request/response DTOs)
//! - Per-frame render snapshot consumed by any drawing surface
//!
//! # Design Principles
//!
//! 1. **No business logic** - Pure data types and serialization
//! 2. **Tolerant reads** - Unknown or missing response fields never fail decoding

pub mod frame;
pub mod scoring;

pub use frame::{
    DialogueView, FrameSnapshot, NpcView, OptimizationStatus, OptimizationView, ResultSource,
};
pub use scoring::{ScoreRequest, ScoreResponse, ScoreValue, DEFAULT_BEST_PROMPT, DEFAULT_SCORE_DISPLAY};
