//! Dialogue presentation with typewriter reveal.
//!
//! A [`Dialogue`] walks through an ordered list of lines. Each line is revealed
//! one character per reveal tick; a single advance control either finishes the
//! current line, moves to the next one, or closes the dialogue. The timer that
//! produces reveal ticks lives with the session, this type only counts.

use provinggrounds_shared::DialogueView;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogueError {
    #[error("Dialogue needs at least one line")]
    EmptyLines,
}

/// Where the typewriter is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    /// `revealed` characters of `line` are visible
    Typing { line: usize, revealed: usize },
    LineComplete { line: usize },
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The rest of the current line was revealed
    Skipped,
    NextLine,
    /// The last line was dismissed. Happens once per dialogue.
    Completed,
    AlreadyClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    Revealed,
    LineComplete,
    /// Not typing; nothing changed
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialogue {
    lines: Vec<String>,
    /// Character count of each line, cached
    lengths: Vec<usize>,
    speaker_name: Option<String>,
    portrait: Option<String>,
    state: DialogueState,
}

impl Dialogue {
    /// Opens a dialogue at the start of its first line.
    pub fn open<I, S>(lines: I) -> Result<Self, DialogueError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            return Err(DialogueError::EmptyLines);
        }
        let lengths = lines.iter().map(|line| line.chars().count()).collect();

        let mut dialogue = Self {
            lines,
            lengths,
            speaker_name: None,
            portrait: None,
            state: DialogueState::Closed,
        };
        dialogue.enter_line(0);
        Ok(dialogue)
    }

    pub fn with_speaker(mut self, name: impl Into<String>) -> Self {
        self.speaker_name = Some(name.into());
        self
    }

    pub fn with_portrait(mut self, portrait: Option<&str>) -> Self {
        self.portrait = portrait.map(str::to_string);
        self
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_typing(&self) -> bool {
        matches!(self.state, DialogueState::Typing { .. })
    }

    pub fn is_closed(&self) -> bool {
        self.state == DialogueState::Closed
    }

    /// The revealed prefix of the current line. Empty once closed.
    pub fn visible_text(&self) -> String {
        match self.state {
            DialogueState::Typing { line, revealed } => {
                self.lines[line].chars().take(revealed).collect()
            }
            DialogueState::LineComplete { line } => self.lines[line].clone(),
            DialogueState::Closed => String::new(),
        }
    }

    fn current_line(&self) -> usize {
        match self.state {
            DialogueState::Typing { line, .. } | DialogueState::LineComplete { line } => line,
            DialogueState::Closed => self.lines.len().saturating_sub(1),
        }
    }

    fn enter_line(&mut self, line: usize) {
        self.state = if self.lengths[line] == 0 {
            DialogueState::LineComplete { line }
        } else {
            DialogueState::Typing { line, revealed: 0 }
        };
    }

    /// One reveal tick: shows the next character of the current line.
    pub fn reveal_next(&mut self) -> RevealOutcome {
        let DialogueState::Typing { line, revealed } = self.state else {
            return RevealOutcome::Idle;
        };

        let revealed = revealed + 1;
        if revealed >= self.lengths[line] {
            self.state = DialogueState::LineComplete { line };
            RevealOutcome::LineComplete
        } else {
            self.state = DialogueState::Typing { line, revealed };
            RevealOutcome::Revealed
        }
    }

    /// Shows the rest of the current line without producing an outcome.
    pub fn reveal_line(&mut self) {
        if let DialogueState::Typing { line, .. } = self.state {
            self.state = DialogueState::LineComplete { line };
        }
    }

    pub fn advance(&mut self) -> AdvanceOutcome {
        match self.state {
            DialogueState::Typing { line, .. } => {
                self.state = DialogueState::LineComplete { line };
                AdvanceOutcome::Skipped
            }
            DialogueState::LineComplete { line } if line + 1 < self.lines.len() => {
                self.enter_line(line + 1);
                AdvanceOutcome::NextLine
            }
            DialogueState::LineComplete { .. } => {
                self.state = DialogueState::Closed;
                AdvanceOutcome::Completed
            }
            DialogueState::Closed => AdvanceOutcome::AlreadyClosed,
        }
    }

    pub fn view(&self) -> DialogueView {
        DialogueView {
            speaker_name: self.speaker_name.clone(),
            portrait: self.portrait.clone(),
            visible_text: self.visible_text(),
            is_typing: self.is_typing(),
            line_index: self.current_line(),
            line_count: self.lines.len(),
        }
    }
}
