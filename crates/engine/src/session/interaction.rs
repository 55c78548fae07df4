//! Talking to NPCs, collecting wisdom and the terminal's optimization flow.

use std::sync::Arc;

use provinggrounds_domain::{Npc, NpcId, NpcRole, WisdomToken};
use provinggrounds_shared::{OptimizationStatus, ResultSource, ScoreRequest, ScoreResponse};

use super::optimization::{OptimizationResult, FALLBACK_SCORE};
use super::{DialoguePurpose, Flags, Session};
use crate::dialogue::{AdvanceOutcome, Dialogue, DialogueError};
use crate::effects::{Effect, Reaction, TimerKey};
use crate::infrastructure::ports::ScoringError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Input dropped: dialogue open, movement locked or optimization pending
    Ignored,
    /// No NPC on the faced cell
    NothingThere,
    DialogueOpened { npc: NpcId },
    AlreadyLearned { token: WisdomToken },
    TerminalLocked { held: usize, required: usize },
    /// Closing the opened dialogue starts the optimization
    TerminalReady,
    /// The optimization already ran; its result is shown again
    ResultShown,
}

impl Session {
    /// Talks to whatever stands on the cell the player faces.
    pub fn interact(&mut self) -> Reaction<InteractionOutcome> {
        if let Some(reason) = self.input_gate() {
            tracing::debug!(reason, "Interaction rejected");
            return self.react(InteractionOutcome::Ignored);
        }

        let catalog = Arc::clone(&self.catalog);
        let target = self.player_position.step(self.facing);
        let Some(npc) = catalog.get_room(self.current_room).npc_at(target) else {
            return self.react(InteractionOutcome::NothingThere);
        };

        let opened = match npc.role() {
            NpcRole::Computer => self.talk_to_terminal(npc),
            NpcRole::Elder | NpcRole::Guide => self.talk_to(npc),
        };
        match opened {
            Ok(outcome) => self.react(outcome),
            Err(e) => {
                tracing::error!(npc = %npc.id(), error = %e, "Failed to open dialogue");
                self.react(InteractionOutcome::Ignored)
            }
        }
    }

    /// The single dialogue control: finish the line, next line, or close.
    ///
    /// Closing applies the dialogue's purpose in the same call.
    pub fn advance_dialogue(&mut self) -> Reaction<AdvanceOutcome> {
        let Some(active) = self.active_dialogue.as_mut() else {
            return self.react(AdvanceOutcome::AlreadyClosed);
        };

        let outcome = active.dialogue.advance();
        match outcome {
            AdvanceOutcome::Skipped => self.cancel(TimerKey::DialogueReveal),
            AdvanceOutcome::NextLine => self.sync_reveal_timer(),
            AdvanceOutcome::Completed => {
                self.cancel(TimerKey::DialogueReveal);
                if let Some(closed) = self.active_dialogue.take() {
                    self.finish_dialogue(closed.purpose);
                }
            }
            AdvanceOutcome::AlreadyClosed => {
                self.active_dialogue = None;
            }
        }
        self.react(outcome)
    }

    /// Applies the scoring service's answer to a pending optimization.
    pub fn settle_score(
        &mut self,
        result: Result<ScoreResponse, ScoringError>,
    ) -> Reaction<OptimizationStatus> {
        if self.optimization.status() != OptimizationStatus::Pending {
            tracing::debug!(
                status = ?self.optimization.status(),
                "Ignoring score settlement outside a pending optimization"
            );
            return self.react(self.optimization.status());
        }

        match result {
            Ok(response) => {
                let result = OptimizationResult::live(&response, self.clock.now());
                tracing::info!(score = %result.score, "Optimization complete");
                let lines = live_result_lines(&result);
                self.optimization.complete(result);
                self.open_terminal_notice(lines);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Scoring failed, falling back to simulated result");
                self.optimization.fail();
                if self.timing.scoring_fallback.is_zero() {
                    self.complete_with_fallback();
                } else {
                    self.schedule(TimerKey::ScoringFallback, self.timing.scoring_fallback);
                }
            }
        }
        self.react(self.optimization.status())
    }

    fn talk_to(&mut self, npc: &Npc) -> Result<InteractionOutcome, DialogueError> {
        if let Some(token) = npc.wisdom().filter(|t| self.inventory.contains(t)) {
            let dialogue = speaker_dialogue(
                npc,
                [format!("You have already learned the way of {token}.")],
            )?;
            self.open_dialogue(dialogue, DialoguePurpose::Notice);
            return Ok(InteractionOutcome::AlreadyLearned {
                token: token.clone(),
            });
        }

        let dialogue = speaker_dialogue(npc, npc.dialogue().iter().cloned())?;
        self.open_dialogue(
            dialogue,
            DialoguePurpose::Conversation {
                npc: npc.id().clone(),
                token: npc.wisdom().cloned(),
            },
        );
        Ok(InteractionOutcome::DialogueOpened {
            npc: npc.id().clone(),
        })
    }

    fn talk_to_terminal(&mut self, npc: &Npc) -> Result<InteractionOutcome, DialogueError> {
        if let Some(result) = self.optimization.result() {
            let lines = match result.source {
                ResultSource::Live => live_result_lines(result),
                ResultSource::Fallback => fallback_result_lines(self),
            };
            self.open_dialogue(speaker_dialogue(npc, lines)?, DialoguePurpose::Notice);
            return Ok(InteractionOutcome::ResultShown);
        }

        let header = terminal_header(npc);
        let held = self.inventory.len();
        let required = self.catalog.required_token_count();

        if held < required {
            let lines = vec![
                header,
                "ERROR: Insufficient wisdom collected.".to_string(),
                format!("Missing keys: {held}/{required}"),
            ];
            self.open_dialogue(speaker_dialogue(npc, lines)?, DialoguePurpose::Notice);
            return Ok(InteractionOutcome::TerminalLocked { held, required });
        }

        let mut lines = vec![
            header,
            "All wisdom keys accepted.".to_string(),
            "Ready to optimize your prompts using:".to_string(),
        ];
        lines.extend(self.inventory.iter().map(|token| format!("- {token}")));
        lines.push("Advance to begin optimization...".to_string());

        self.open_dialogue(speaker_dialogue(npc, lines)?, DialoguePurpose::TerminalReady);
        Ok(InteractionOutcome::TerminalReady)
    }

    fn finish_dialogue(&mut self, purpose: DialoguePurpose) {
        match purpose {
            DialoguePurpose::Conversation { npc, token } => {
                self.flags.set(Flags::spoke_to_key(&npc), true);
                if let Some(token) = token {
                    if self.inventory.insert(token.clone()) {
                        tracing::info!(
                            %npc,
                            %token,
                            held = self.inventory.len(),
                            required = self.catalog.required_token_count(),
                            "Wisdom acquired"
                        );
                    }
                }
            }
            DialoguePurpose::TerminalReady => self.start_optimization(),
            DialoguePurpose::Notice => {}
        }
    }

    fn start_optimization(&mut self) {
        if !self.optimization.begin() {
            tracing::debug!(status = ?self.optimization.status(), "Optimization already started");
            return;
        }
        let request = ScoreRequest::new(self.inventory.to_vec(), self.scoring_task.clone());
        tracing::info!(
            tokens = request.prompts.len(),
            task = %request.task,
            "Optimization started"
        );
        self.effects.push(Effect::SubmitScore(request));
    }

    /// Ends a failed optimization with the simulated result.
    pub(super) fn complete_with_fallback(&mut self) {
        if self.optimization.status() != OptimizationStatus::Failed {
            return;
        }
        self.optimization
            .complete(OptimizationResult::fallback(self.clock.now()));
        tracing::info!(score = FALLBACK_SCORE, "Optimization complete (simulated)");
        let lines = fallback_result_lines(self);
        self.open_terminal_notice(lines);
    }

    /// Opens a notice spoken by the catalog's terminal.
    fn open_terminal_notice(&mut self, lines: Vec<String>) {
        let catalog = Arc::clone(&self.catalog);
        let terminal = catalog
            .rooms()
            .flat_map(|room| room.npcs())
            .find(|npc| npc.role() == NpcRole::Computer);

        let dialogue = match terminal {
            Some(npc) => speaker_dialogue(npc, lines),
            None => Dialogue::open(lines),
        };
        match dialogue {
            Ok(dialogue) => self.open_dialogue(dialogue, DialoguePurpose::Notice),
            Err(e) => tracing::error!(error = %e, "Failed to open result dialogue"),
        }
    }
}

fn speaker_dialogue<I, S>(npc: &Npc, lines: I) -> Result<Dialogue, DialogueError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Ok(Dialogue::open(lines)?
        .with_speaker(npc.name())
        .with_portrait(npc.portrait()))
}

fn terminal_header(npc: &Npc) -> String {
    npc.dialogue()
        .first()
        .cloned()
        .unwrap_or_else(|| npc.name().to_uppercase())
}

fn live_result_lines(result: &OptimizationResult) -> Vec<String> {
    vec![
        "OPTIMIZATION COMPLETE!".to_string(),
        "Your prompts have been optimized using DSPy.".to_string(),
        "Results:".to_string(),
        format!("Best performing prompt: {}", result.best_prompt),
        format!("Score: {}%", result.score),
        "All wisdoms have been unified!".to_string(),
    ]
}

fn fallback_result_lines(session: &Session) -> Vec<String> {
    let mut lines = vec![
        "OPTIMIZATION SIMULATED".to_string(),
        "(Scoring service unreachable - showing demo results)".to_string(),
        String::new(),
        "Combined the collected wisdom:".to_string(),
    ];
    lines.extend(session.inventory.iter().map(|token| format!("- {token}")));
    lines.extend([
        "Result: Optimal prompt strategy achieved!".to_string(),
        format!("Score: {FALLBACK_SCORE}%"),
        String::new(),
        "Congratulations! You have mastered the art of prompting!".to_string(),
    ]);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameTiming;
    use crate::dialogue::DialogueState;
    use crate::infrastructure::ports::MockClockPort;
    use crate::session::{MoveOutcome, TimerOutcome};
    use crate::test_fixtures::{
        all_tokens, at_terminal, fixed_time, new_session, run_dialogue_to_close, session_at,
    };
    use chrono::{TimeZone, Utc};
    use provinggrounds_domain::{Direction, GridPos, RoomId, WorldCatalog};
    use provinggrounds_shared::ScoreValue;

    fn facing_bootstrap(timing: GameTiming) -> Session {
        session_at(RoomId::Archive, GridPos::new(3, 5), Direction::Left, timing)
    }

    fn visible_text(session: &Session) -> String {
        session
            .active_dialogue()
            .map(|active| active.dialogue.visible_text())
            .unwrap_or_default()
    }

    // =========================================================================
    // Elders and guides
    // =========================================================================

    #[test]
    fn archive_elder_grants_exactly_one_token() {
        let mut session = facing_bootstrap(GameTiming::default());

        let opened = session.interact();
        assert_eq!(
            opened.outcome,
            InteractionOutcome::DialogueOpened {
                npc: NpcId::new("elder_bootstrap")
            }
        );
        assert!(opened.scheduled(TimerKey::DialogueReveal).is_some());

        let completions = run_dialogue_to_close(&mut session);

        assert_eq!(completions, 1);
        assert!(session.active_dialogue().is_none());
        assert_eq!(session.inventory().len(), 1);
        assert!(session
            .inventory()
            .contains(&WisdomToken::new("BootstrapFewShot")));
        assert!(session.flags().get("spoke_to:elder_bootstrap"));

        // Advancing a closed dialogue changes nothing
        let extra = session.advance_dialogue();
        assert_eq!(extra.outcome, AdvanceOutcome::AlreadyClosed);
        assert_eq!(session.inventory().len(), 1);
    }

    #[test]
    fn walking_up_to_archive_elder_and_talking_grants_token() {
        let mut session = session_at(
            RoomId::Archive,
            GridPos::new(4, 5),
            Direction::Right,
            GameTiming::instant(),
        );

        let step = session.attempt_move(Direction::Left);
        assert_eq!(step.outcome, MoveOutcome::Moved);
        assert_eq!(session.player_position(), GridPos::new(3, 5));
        assert_eq!(session.facing(), Direction::Left);
        assert!(!session.is_movement_locked());

        assert!(matches!(
            session.interact().outcome,
            InteractionOutcome::DialogueOpened { .. }
        ));
        assert_eq!(run_dialogue_to_close(&mut session), 1);

        assert!(session.active_dialogue().is_none());
        assert_eq!(session.inventory().len(), 1);
        assert!(session
            .inventory()
            .contains(&WisdomToken::new("BootstrapFewShot")));
    }

    #[test]
    fn elder_dialogue_reveals_on_timer_ticks() {
        let mut session = facing_bootstrap(GameTiming::default());
        let mut ticket = session
            .interact()
            .scheduled(TimerKey::DialogueReveal)
            .expect("reveal timer");

        for expected in ["W", "We", "Wel"] {
            let tick = session.on_timer(ticket);
            assert_eq!(tick.outcome, TimerOutcome::Applied);
            assert_eq!(visible_text(&session), expected);
            ticket = tick.scheduled(TimerKey::DialogueReveal).expect("next tick");
        }
    }

    #[test]
    fn skip_invalidates_pending_reveal_tick() {
        let mut session = facing_bootstrap(GameTiming::default());
        let ticket = session
            .interact()
            .scheduled(TimerKey::DialogueReveal)
            .expect("reveal timer");

        let skipped = session.advance_dialogue();
        assert_eq!(skipped.outcome, AdvanceOutcome::Skipped);
        assert!(skipped.effects.contains(&Effect::CancelTimer {
            key: TimerKey::DialogueReveal
        }));
        assert_eq!(visible_text(&session), "Welcome to the Archive.");

        // The next line starts with a fresh generation; the old tick is dead
        let next = session.advance_dialogue();
        assert_eq!(next.outcome, AdvanceOutcome::NextLine);
        assert_eq!(session.on_timer(ticket).outcome, TimerOutcome::Discarded);
        assert_eq!(visible_text(&session), "");
    }

    #[test]
    fn returning_to_elder_shows_already_learned() {
        let mut session = facing_bootstrap(GameTiming::instant());
        session.interact();
        run_dialogue_to_close(&mut session);

        let again = session.interact();

        assert_eq!(
            again.outcome,
            InteractionOutcome::AlreadyLearned {
                token: WisdomToken::new("BootstrapFewShot")
            }
        );
        let active = session.active_dialogue().expect("dialogue");
        assert_eq!(active.dialogue.lines().len(), 1);
        assert_eq!(
            visible_text(&session),
            "You have already learned the way of BootstrapFewShot."
        );

        run_dialogue_to_close(&mut session);
        assert_eq!(session.inventory().len(), 1);
    }

    #[test]
    fn token_acquisition_is_idempotent() {
        let token = WisdomToken::new("BootstrapFewShot");
        let mut session = facing_bootstrap(GameTiming::instant()).with_tokens([token.clone()]);

        session.interact();
        run_dialogue_to_close(&mut session);

        let held: Vec<&WisdomToken> = session.inventory().iter().collect();
        assert_eq!(held, vec![&token]);
    }

    #[test]
    fn guide_sets_flag_without_token() {
        let mut session = session_at(
            RoomId::Nexus,
            GridPos::new(7, 6),
            Direction::Up,
            GameTiming::instant(),
        );

        assert_eq!(
            session.interact().outcome,
            InteractionOutcome::DialogueOpened {
                npc: NpcId::new("epoch")
            }
        );
        assert_eq!(run_dialogue_to_close(&mut session), 1);
        assert!(session.inventory().is_empty());
        assert!(session.flags().get("spoke_to:epoch"));
    }

    #[test]
    fn empty_cell_is_nothing_there() {
        let mut session = new_session(GameTiming::default());
        let reaction = session.interact();

        assert_eq!(reaction.outcome, InteractionOutcome::NothingThere);
        assert!(reaction.effects.is_empty());
    }

    #[test]
    fn interact_while_dialogue_open_is_a_no_op() {
        let mut session = facing_bootstrap(GameTiming::default());
        session.interact();
        session.advance_dialogue();
        let before = session.active_dialogue().map(|a| a.dialogue.state());

        let reaction = session.interact();

        assert_eq!(reaction.outcome, InteractionOutcome::Ignored);
        assert!(reaction.effects.is_empty());
        assert_eq!(
            session.active_dialogue().map(|a| a.dialogue.state()),
            before
        );
        assert_eq!(before, Some(DialogueState::LineComplete { line: 0 }));
    }

    #[test]
    fn interact_during_step_lock_is_ignored() {
        let mut session = session_at(
            RoomId::Archive,
            GridPos::new(4, 5),
            Direction::Left,
            GameTiming::default(),
        );
        session.attempt_move(Direction::Left);
        assert!(session.is_movement_locked());

        assert_eq!(session.interact().outcome, InteractionOutcome::Ignored);
        assert!(session.active_dialogue().is_none());
    }

    // =========================================================================
    // Terminal
    // =========================================================================

    #[test]
    fn terminal_locked_with_two_of_three() {
        let mut session = at_terminal(2, GameTiming::instant());

        let reaction = session.interact();

        assert_eq!(
            reaction.outcome,
            InteractionOutcome::TerminalLocked {
                held: 2,
                required: 3
            }
        );
        let lines = session.active_dialogue().expect("dialogue").dialogue.lines().to_vec();
        assert_eq!(lines.last().map(String::as_str), Some("Missing keys: 2/3"));

        run_dialogue_to_close(&mut session);
        assert_eq!(session.optimization().status(), OptimizationStatus::Idle);
    }

    #[test]
    fn terminal_unlocks_with_third_token() {
        let mut session = at_terminal(2, GameTiming::instant());
        assert!(matches!(
            session.interact().outcome,
            InteractionOutcome::TerminalLocked { .. }
        ));
        run_dialogue_to_close(&mut session);

        let mut session = session
            .with_position(RoomId::Sanctum, GridPos::new(11, 5), Direction::Right)
            .unwrap();
        session.interact();
        run_dialogue_to_close(&mut session);
        assert_eq!(session.inventory().len(), 3);

        let mut session = session
            .with_position(RoomId::Core, GridPos::new(7, 3), Direction::Up)
            .unwrap();
        assert_eq!(session.interact().outcome, InteractionOutcome::TerminalReady);
    }

    #[test]
    fn terminal_ready_submits_held_tokens_on_close() {
        let mut session = at_terminal(3, GameTiming::instant()).with_scoring_task("general_qa");

        assert_eq!(session.interact().outcome, InteractionOutcome::TerminalReady);
        let lines = session.active_dialogue().expect("dialogue").dialogue.lines().to_vec();
        assert!(lines.contains(&"- MIPRO".to_string()));

        let mut request = None;
        while session.active_dialogue().is_some() {
            let reaction = session.advance_dialogue();
            if let Some(r) = reaction.score_request() {
                request = Some(r.clone());
            }
        }

        let request = request.expect("score request");
        assert_eq!(request.prompts, all_tokens());
        assert_eq!(request.task, "general_qa");
        assert_eq!(session.optimization().status(), OptimizationStatus::Pending);
    }

    #[test]
    fn pending_optimization_freezes_input() {
        let mut session = at_terminal(3, GameTiming::instant());
        session.interact();
        run_dialogue_to_close(&mut session);

        assert_eq!(session.interact().outcome, InteractionOutcome::Ignored);
        assert_eq!(
            session.attempt_move(Direction::Down).outcome,
            MoveOutcome::Blocked
        );
        assert_eq!(session.player_position(), GridPos::new(7, 3));
    }

    // =========================================================================
    // Score settlement
    // =========================================================================

    #[test]
    fn failed_scoring_falls_back_after_delay() {
        let mut session = at_terminal(3, GameTiming::default());
        session.interact();
        run_dialogue_to_close(&mut session);

        let failed = session.settle_score(Err(ScoringError::RequestFailed(
            "connection refused".into(),
        )));
        assert_eq!(failed.outcome, OptimizationStatus::Failed);
        assert!(session.active_dialogue().is_none());
        let fallback = failed
            .scheduled(TimerKey::ScoringFallback)
            .expect("fallback timer");
        assert!(failed.effects.contains(&Effect::ScheduleTimer {
            ticket: fallback,
            delay: std::time::Duration::from_millis(1500),
        }));

        session.on_timer(fallback);

        let optimization = session.optimization();
        assert_eq!(optimization.status(), OptimizationStatus::Complete);
        let result = optimization.result().expect("result");
        assert_eq!(result.source, ResultSource::Fallback);
        assert_eq!(result.score, "96.5");
        assert_eq!(result.completed_at, fixed_time());

        let active = session.active_dialogue().expect("score dialogue");
        assert_eq!(active.dialogue.lines()[0], "OPTIMIZATION SIMULATED");
        assert!(active.dialogue.lines().contains(&"Score: 96.5%".to_string()));
        assert_eq!(
            active.dialogue.view().speaker_name.as_deref(),
            Some("DSPy Core Terminal")
        );
    }

    #[test]
    fn live_scoring_completes_with_service_result() {
        let mut clock = MockClockPort::new();
        let finished = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        clock.expect_now().times(1).return_const(finished);

        let mut session = Session::new(WorldCatalog::shared(), GameTiming::instant(), Arc::new(clock))
            .with_position(RoomId::Core, GridPos::new(7, 3), Direction::Up)
            .unwrap()
            .with_tokens(all_tokens());
        session.interact();
        run_dialogue_to_close(&mut session);

        let settled = session.settle_score(Ok(ScoreResponse {
            score: Some(ScoreValue::Number(97.25)),
            best_prompt: None,
        }));

        assert_eq!(settled.outcome, OptimizationStatus::Complete);
        let result = session.optimization().result().expect("result");
        assert_eq!(result.source, ResultSource::Live);
        assert_eq!(result.score, "97.25");
        assert_eq!(result.best_prompt, "Combination of all wisdom");
        assert_eq!(result.completed_at, finished);

        let lines = session.active_dialogue().expect("dialogue").dialogue.lines().to_vec();
        assert_eq!(lines[0], "OPTIMIZATION COMPLETE!");
        assert!(lines.contains(&"Score: 97.25%".to_string()));
    }

    #[test]
    fn zero_fallback_delay_completes_in_same_call() {
        let mut session = at_terminal(3, GameTiming::instant());
        session.interact();
        run_dialogue_to_close(&mut session);

        let settled = session.settle_score(Err(ScoringError::status(500, "boom")));

        assert_eq!(settled.outcome, OptimizationStatus::Complete);
        assert!(settled.scheduled(TimerKey::ScoringFallback).is_none());
        assert_eq!(
            session.optimization().result().map(|r| r.source),
            Some(ResultSource::Fallback)
        );
    }

    #[test]
    fn settlement_without_pending_request_is_ignored() {
        let mut session = at_terminal(3, GameTiming::instant());

        let settled = session.settle_score(Ok(ScoreResponse::default()));

        assert_eq!(settled.outcome, OptimizationStatus::Idle);
        assert!(session.optimization().result().is_none());
        assert!(session.active_dialogue().is_none());
    }

    #[test]
    fn completed_terminal_replays_result() {
        let mut session = at_terminal(3, GameTiming::instant());
        session.interact();
        run_dialogue_to_close(&mut session);
        session.settle_score(Err(ScoringError::status(503, "")));
        run_dialogue_to_close(&mut session);

        assert_eq!(session.interact().outcome, InteractionOutcome::ResultShown);
        let lines = session.active_dialogue().expect("dialogue").dialogue.lines().to_vec();
        assert_eq!(lines[0], "OPTIMIZATION SIMULATED");

        // Closing the replay never submits again
        while session.active_dialogue().is_some() {
            assert!(session.advance_dialogue().score_request().is_none());
        }
        assert_eq!(session.optimization().status(), OptimizationStatus::Complete);
    }
}
