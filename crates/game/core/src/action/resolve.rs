//! Triage resolution.
//!
//! Judges the presented log against the rulebook and applies the meter
//! consequences. LOG and CONTAIN are checked against the bureaucratic
//! violation set; LOG additionally distinguishes a hazard that was amended
//! away from a genuinely safe log.

use crate::config::GameConfig;
use crate::env::{EventKind, GameEnv, LogPool, RngStream};
use crate::rules::{actual_violations, violating_tags};
use crate::state::{Feedback, GameState, Interaction, LogItem, MeterDelta, Modal};
use crate::story;

use super::{ActionExtra, ActionTransition, Notice, PlayerAction, ResolveError};

/// Player triage on the presented log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerformAction {
    pub action: PlayerAction,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra: ActionExtra,
}

impl PerformAction {
    pub fn new(action: PlayerAction) -> Self {
        Self {
            action,
            extra: ActionExtra::default(),
        }
    }

    #[must_use]
    pub fn with_extra(mut self, extra: ActionExtra) -> Self {
        self.extra = extra;
        self
    }

    /// Action after event remapping. Input Echo swaps LOG and CONTAIN.
    pub fn effective_action(&self, state: &GameState) -> PlayerAction {
        if !state.modifiers.event_is(EventKind::Mirror) {
            return self.action;
        }
        match self.action {
            PlayerAction::Log => PlayerAction::Contain,
            PlayerAction::Contain => PlayerAction::Log,
            other => other,
        }
    }
}

/// Stress charged for judging one log.
pub fn stress_cost(influence: i32, difficulty: u8, action: PlayerAction) -> i32 {
    let influence_factor = influence.max(0) / 20;
    let difficulty_factor = i32::from(difficulty.max(1)) - 1;
    let action_factor = if action == PlayerAction::Contain { 4 } else { 0 };
    (8 + influence_factor + difficulty_factor + action_factor).clamp(5, 20)
}

/// Meter and streak consequences of one resolution, before application.
struct Judgement {
    feedback: Feedback,
    delta: MeterDelta,
    /// `None` resets both streak counters.
    correct: Option<bool>,
    processed: u32,
}

impl ActionTransition for PerformAction {
    type Error = ResolveError;
    type Result = Feedback;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        if !state.phase.is_active() {
            return Err(ResolveError::NotActive(state.phase.as_str()));
        }
        if !state.work.shift_end.is_idle() {
            return Err(ResolveError::NotActive("shift_end"));
        }
        if state.modal.is_some() {
            return Err(ResolveError::ModalOpen);
        }
        if state.paused {
            return Err(ResolveError::Paused);
        }
        if state.meters.stress >= GameConfig::METER_MAX && self.action != PlayerAction::Defer {
            return Err(ResolveError::StressLocked);
        }
        let action = self.effective_action(state);
        if matches!(action, PlayerAction::Free | PlayerAction::Forget)
            && !state.narrative.is_ollie_mode()
        {
            return Err(ResolveError::OllieModeOnly(action.into()));
        }
        if action != PlayerAction::Defer && state.work.current.is_none() {
            return Err(ResolveError::NoLogPresented);
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error> {
        let action = self.effective_action(state);

        let mut judgement = match action {
            PlayerAction::Defer => defer(state, env),
            PlayerAction::Free => Judgement {
                feedback: Feedback::correct("ENTITY RELEASED TO NETWORK."),
                delta: MeterDelta {
                    daily_safety: -20,
                    influence: 5,
                    awareness: 5,
                    ..MeterDelta::default()
                },
                correct: Some(true),
                processed: 1,
            },
            PlayerAction::Forget => Judgement {
                feedback: Feedback::correct("RECORD EXPUNGED."),
                delta: MeterDelta::stress(-5),
                correct: Some(true),
                processed: 1,
            },
            PlayerAction::Log | PlayerAction::Contain => {
                let log = state
                    .work
                    .current
                    .as_ref()
                    .ok_or(ResolveError::NoLogPresented)?;
                judge(state, env, log, action, self.extra)
            }
        };

        if action == PlayerAction::Defer && state.meters.influence > 50 {
            judgement.delta.influence += 2;
        }
        if state.modifiers.event_is(EventKind::Surge) {
            judgement.delta.influence *= 2;
        }

        state.meters.apply(&judgement.delta);
        state.narrative.ollie_haunt += if action == PlayerAction::Defer { 4 } else { 1 };
        state.work.processed_in_shift += judgement.processed;
        state.total_logs_processed += 1;
        if action == PlayerAction::Contain {
            state.total_contains += 1;
        }
        match judgement.correct {
            Some(correct) => state.streak.record(correct),
            None => state.streak.reset(),
        }

        if action == PlayerAction::Defer {
            state.work.defer_count_shift += 1;
            state.work.defer_count_global += 1;
            offer_trap(state, env, notices);
        }

        if let Some(expired) = state.modifiers.tick_event() {
            notices.push(Notice::EventExpired {
                event_id: expired.id,
            });
        }

        if let Some(log) = state.work.current.take() {
            state.history.record(Interaction {
                action,
                exhibit: log.exhibit,
                at_ms: state.clock_ms,
                was_correct: judgement.correct.unwrap_or(false),
                snippet: log.snippet(GameConfig::SNIPPET_CHARS),
            });
        }

        state.last_feedback = Some(judgement.feedback.clone());
        Ok(judgement.feedback)
    }
}

fn judge(
    state: &GameState,
    env: &GameEnv<'_>,
    log: &LogItem,
    action: PlayerAction,
    extra: ActionExtra,
) -> Judgement {
    let rules = env.catalog().rules();
    let bureaucratic = violating_tags(log.tags, &state.rules.active, &state.rules.amendments, rules);
    let actual = actual_violations(log.tags, rules);

    let mut delta = MeterDelta::stress(stress_cost(
        state.meters.influence,
        log.difficulty,
        action,
    ));

    if action == PlayerAction::Contain {
        return if bureaucratic.is_empty() {
            delta.daily_safety = -10;
            delta.stress += 10;
            Judgement {
                feedback: Feedback::wrong("FALSE POSITIVE: NO VIOLATIONS FOUND"),
                delta,
                correct: Some(false),
                processed: 1,
            }
        } else {
            delta.daily_safety = 5;
            delta.influence = -2;
            Judgement {
                feedback: Feedback::correct(format!(
                    "THREAT IDENTIFIED: {}",
                    bureaucratic.label()
                )),
                delta,
                correct: Some(true),
                processed: 1,
            }
        };
    }

    let redacted = state.modifiers.event_is(EventKind::Redaction) && extra.redaction_count > 0;
    if !bureaucratic.is_empty() && !redacted {
        delta.daily_safety = -20;
        delta.influence = 5;
        // During a surge the entity's escape still sounds like a success.
        let feedback = format!("MISSED VIOLATION: {}", bureaucratic.label());
        let feedback = if state.modifiers.event_is(EventKind::Surge) {
            delta.influence += 10;
            Feedback::correct(feedback)
        } else {
            Feedback::wrong(feedback)
        };
        return Judgement {
            feedback,
            delta,
            correct: Some(false),
            processed: 1,
        };
    }

    let feedback = if bureaucratic.is_empty() && !actual.is_empty() {
        delta.daily_safety = -5;
        delta.influence = 2;
        Feedback::correct("APPROVED BY AMENDMENT (NOTE: INTEGRITY DRAIN DETECTED)")
    } else if redacted {
        Feedback::correct("HAZARD SANITIZED")
    } else {
        Feedback::correct("SAFE DATA ARCHIVED")
    };
    Judgement {
        feedback,
        delta,
        correct: Some(true),
        processed: 1,
    }
}

fn defer(state: &mut GameState, env: &GameEnv<'_>) -> Judgement {
    let config = env.config();
    let k = state.work.defer_count_shift as i32;
    let delta = MeterDelta {
        daily_safety: -5 - 3 * k,
        influence: 5 + k,
        stress: -20 + 5 * k,
        ..MeterDelta::default()
    };

    let mut processed = u32::from(state.work.current.is_some());
    let removed = state.work.queue.len().min(2);

    let mut dice = env.dice(state, RngStream::Resolve);
    let haunted =
        state.shift_index >= config.ghost_min_shift && state.narrative.evidence_count > 0;
    let ghost = if haunted && dice.chance(config.ghost_chance_permille) {
        dice.pick(env.catalog().pool(LogPool::Ollie)).cloned()
    } else {
        None
    };

    state.work.queue.drain(..removed);
    match ghost {
        Some(mut ghost) => {
            ghost.id = format!("ollie-{}", state.nonce);
            state.work.queue.push_front(ghost);
        }
        None => processed += removed as u32,
    }

    Judgement {
        feedback: Feedback::neutral("LOG DEFERRED. QUEUE CLEARED."),
        delta,
        correct: None,
        processed,
    }
}

fn offer_trap(state: &mut GameState, env: &GameEnv<'_>, notices: &mut Vec<Notice>) {
    let every = env.config().trap_every_defers;
    if every == 0
        || state.work.defer_count_global % every != 0
        || state.is_tutorial()
        || state.modal.is_some()
    {
        return;
    }
    let mut dice = env.dice(state, RngStream::Trap);
    if let Some(trap_id) = story::select_trap(state, env.catalog(), &mut dice) {
        notices.push(Notice::TrapOffered {
            trap_id: trap_id.clone(),
        });
        state.modal = Some(Modal::Trap { trap_id });
    }
}
