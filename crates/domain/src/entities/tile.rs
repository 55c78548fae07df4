//! Tile values for room grids

use serde::{Deserialize, Serialize};

/// One cell of a room grid.
///
/// `Door` and `Terminal` are cosmetic: what happens on or in front of them is
/// decided by the room's exit and NPC tables, never by the tile value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tile {
    #[default]
    Floor,
    Wall,
    Door,
    Terminal,
}

impl Tile {
    /// Whether the tile value alone allows the player to stand on it.
    pub fn is_passable(&self) -> bool {
        !matches!(self, Self::Wall)
    }
}
