//! Value objects - Immutable objects defined by their attributes

mod grid;
mod wisdom;

pub use grid::{Direction, GridPos};
pub use wisdom::WisdomToken;
