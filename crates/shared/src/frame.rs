//! Render snapshot types.
//!
//! The engine publishes one [`FrameSnapshot`] after every processed event. A
//! surface reads whichever snapshot is current; it never sees a room id from
//! one state and a position from another.

use serde::{Deserialize, Serialize};

use provinggrounds_domain::{Direction, GridPos, NpcRole, RoomId, Tile};

/// Where an optimization result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    /// Returned by the scoring service
    Live,
    /// Synthesized locally after the service failed
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStatus {
    #[default]
    Idle,
    Pending,
    Complete,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationView {
    pub status: OptimizationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ResultSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcView {
    pub id: String,
    pub name: String,
    pub position: GridPos,
    pub sprite: String,
    pub role: NpcRole,
    /// The player already holds the token this NPC grants
    pub token_held: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<String>,
    /// Revealed prefix of the current line
    pub visible_text: String,
    pub is_typing: bool,
    pub line_index: usize,
    pub line_count: usize,
}

impl DialogueView {
    /// The blinking "more" marker shows once the line is fully revealed.
    pub fn shows_more_indicator(&self) -> bool {
        !self.is_typing
    }
}

/// Everything a surface needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    pub room_id: RoomId,
    pub room_name: String,
    pub width: u32,
    pub height: u32,
    /// Row-major
    pub tiles: Vec<Tile>,
    pub npcs: Vec<NpcView>,
    pub player_position: GridPos,
    pub facing: Direction,
    pub movement_locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<DialogueView>,
    pub inventory_count: usize,
    pub required_tokens: usize,
    pub optimization: OptimizationView,
}

impl FrameSnapshot {
    pub fn tile_at(&self, pos: GridPos) -> Option<Tile> {
        if pos.x < 0 || pos.y < 0 || pos.x as u32 >= self.width || pos.y as u32 >= self.height {
            return None;
        }
        self.tiles
            .get(pos.y as usize * self.width as usize + pos.x as usize)
            .copied()
    }

    pub fn npc_at(&self, pos: GridPos) -> Option<&NpcView> {
        self.npcs.iter().find(|npc| npc.position == pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> FrameSnapshot {
        FrameSnapshot {
            room_id: RoomId::Archive,
            room_name: "Archive of Examples".into(),
            width: 2,
            height: 2,
            tiles: vec![Tile::Wall, Tile::Floor, Tile::Door, Tile::Floor],
            npcs: vec![NpcView {
                id: "elder_bootstrap".into(),
                name: "Master Bootstrap".into(),
                position: GridPos::new(1, 1),
                sprite: "elder_bootstrap".into(),
                role: NpcRole::Elder,
                token_held: false,
            }],
            player_position: GridPos::new(1, 0),
            facing: Direction::Down,
            movement_locked: false,
            dialogue: None,
            inventory_count: 0,
            required_tokens: 3,
            optimization: OptimizationView::default(),
        }
    }

    #[test]
    fn tile_lookup_is_row_major() {
        let frame = snapshot();
        assert_eq!(frame.tile_at(GridPos::new(0, 1)), Some(Tile::Door));
        assert_eq!(frame.tile_at(GridPos::new(1, 0)), Some(Tile::Floor));
        assert_eq!(frame.tile_at(GridPos::new(2, 0)), None);
        assert_eq!(frame.tile_at(GridPos::new(0, -1)), None);
    }

    #[test]
    fn npc_lookup_by_position() {
        let frame = snapshot();
        assert_eq!(
            frame.npc_at(GridPos::new(1, 1)).map(|n| n.name.as_str()),
            Some("Master Bootstrap")
        );
        assert!(frame.npc_at(GridPos::new(0, 0)).is_none());
    }

    #[test]
    fn idle_optimization_omits_empty_fields() {
        let json = serde_json::to_value(snapshot()).unwrap();
        assert_eq!(json["optimization"], serde_json::json!({ "status": "idle" }));
        assert!(json.get("dialogue").is_none());
    }

    #[test]
    fn more_indicator_follows_typing() {
        let mut view = DialogueView {
            speaker_name: None,
            portrait: None,
            visible_text: "Wel".into(),
            is_typing: true,
            line_index: 0,
            line_count: 1,
        };
        assert!(!view.shows_more_indicator());
        view.is_typing = false;
        assert!(view.shows_more_indicator());
    }
}
