//! Text rendering of frame snapshots.

use std::fmt::Write as _;
use std::io;

use provinggrounds_domain::{GridPos, NpcRole, Tile};
use provinggrounds_shared::{FrameSnapshot, NpcView, OptimizationStatus, ResultSource};

/// Anything that can draw a frame.
pub trait RenderSurface {
    fn render(&mut self, frame: &FrameSnapshot) -> io::Result<()>;
}

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Draws frames as ASCII art to a writer, typically stdout.
pub struct AsciiRenderer<W: io::Write> {
    out: W,
    clear_screen: bool,
}

impl<W: io::Write> AsciiRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            clear_screen: true,
        }
    }

    /// Whether to clear the terminal before every frame.
    pub fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> RenderSurface for AsciiRenderer<W> {
    fn render(&mut self, frame: &FrameSnapshot) -> io::Result<()> {
        if self.clear_screen {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        self.out.write_all(render_to_string(frame).as_bytes())?;
        self.out.flush()
    }
}

/// The full text of one frame: room name, grid, status line and dialogue box.
pub fn render_to_string(frame: &FrameSnapshot) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "== {} ==", frame.room_name);

    for y in 0..frame.height as i32 {
        let row: String = (0..frame.width as i32)
            .map(|x| cell_glyph(frame, GridPos::new(x, y)))
            .collect();
        let _ = writeln!(text, "{row}");
    }

    let _ = writeln!(text, "{}", status_line(frame));

    if let Some(dialogue) = &frame.dialogue {
        let _ = writeln!(text);
        if let Some(speaker) = &dialogue.speaker_name {
            let _ = writeln!(text, "[{speaker}]");
        }
        let marker = if dialogue.shows_more_indicator() { " ▼" } else { "" };
        let _ = writeln!(text, "{}{marker}", dialogue.visible_text);
        let _ = writeln!(text, "({}/{})", dialogue.line_index + 1, dialogue.line_count);
    }

    text
}

fn cell_glyph(frame: &FrameSnapshot, pos: GridPos) -> char {
    if pos == frame.player_position {
        return '@';
    }
    if let Some(npc) = frame.npc_at(pos) {
        return npc_glyph(npc);
    }
    match frame.tile_at(pos) {
        Some(Tile::Wall) => '#',
        Some(Tile::Door) => '+',
        Some(Tile::Terminal) => '=',
        Some(Tile::Floor) => '.',
        None => ' ',
    }
}

fn npc_glyph(npc: &NpcView) -> char {
    match npc.role {
        NpcRole::Elder if npc.token_held => 'e',
        NpcRole::Elder => 'E',
        NpcRole::Computer => 'C',
        NpcRole::Guide => 'G',
    }
}

fn status_line(frame: &FrameSnapshot) -> String {
    let optimization = &frame.optimization;
    let status = match optimization.status {
        OptimizationStatus::Idle => "idle".to_string(),
        OptimizationStatus::Pending => "optimizing...".to_string(),
        OptimizationStatus::Failed => "service unreachable, simulating...".to_string(),
        OptimizationStatus::Complete => {
            let score = optimization.score.as_deref().unwrap_or("?");
            match optimization.source {
                Some(ResultSource::Fallback) => format!("complete ({score}%, simulated)"),
                _ => format!("complete ({score}%)"),
            }
        }
    };
    let access = if frame.inventory_count >= frame.required_tokens {
        "READY"
    } else {
        "LOCKED"
    };
    format!(
        "Wisdom: {}/{} | Computer Access: {access} | Optimization: {status}",
        frame.inventory_count, frame.required_tokens
    )
}
