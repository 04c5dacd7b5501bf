//! Phase transitions driven by the player between and around shifts.

use crate::env::{EmailEffect, GameEnv, LunchEffect, ReviewChoice, RngStream, compute_seed};
use crate::shift;
use crate::state::{GameState, Phase, StoryFlags};

use super::{ActionTransition, LifecycleError, Notice};

fn choice_index(index: usize, available: usize) -> Result<usize, LifecycleError> {
    if index < available {
        Ok(index)
    } else {
        Err(LifecycleError::InvalidChoice { index, available })
    }
}

// ============================================================================
// Intro
// ============================================================================

/// Acknowledges the intro sequence and opens the first email.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompleteIntroAction;

impl ActionTransition for CompleteIntroAction {
    type Error = LifecycleError;
    type Result = ();

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        match state.phase {
            Phase::Intro => Ok(()),
            _ => Err(LifecycleError::wrong_phase(
                "complete_intro",
                state.phase.as_str(),
            )),
        }
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error> {
        state.has_seen_intro = true;
        shift::open_email_or_standby(state, env, notices);
        Ok(())
    }
}

// ============================================================================
// Shift start
// ============================================================================

/// Clocks in: resets the per-shift meters and starts presenting logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartShiftAction;

impl ActionTransition for StartShiftAction {
    type Error = LifecycleError;
    type Result = ();

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        match state.phase {
            Phase::Standby => Ok(()),
            _ => Err(LifecycleError::wrong_phase("start_shift", state.phase.as_str())),
        }
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error> {
        let config = env.config();

        state.work.reset_for_shift();
        state.work.shift_serial += 1;
        state.work.next_spawn_at_ms = state.clock_ms + config.spawn_interval_ms;
        state.work.next_poll_at_ms = state.clock_ms + config.poll_interval_ms;
        state.rules.next_rot_at_ms = state.clock_ms + config.rule_rot_interval_ms;
        state.meters.stress = 0;
        state.meters.daily_safety = 100;
        state.paused = false;
        state.modal = None;
        state.last_feedback = None;
        state.phase = if state.is_tutorial() {
            Phase::TutorialActive
        } else {
            Phase::ShiftActive
        };

        notices.push(Notice::ShiftStarted {
            shift_index: state.shift_index,
        });
        Ok(())
    }
}

// ============================================================================
// Lunch
// ============================================================================

/// Picks a conversation option during the lunch break.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompleteLunchAction {
    pub choice: usize,
}

impl CompleteLunchAction {
    pub fn new(choice: usize) -> Self {
        Self { choice }
    }
}

impl ActionTransition for CompleteLunchAction {
    type Error = LifecycleError;
    type Result = ();

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let Phase::LunchBreak { lunch_id } = &state.phase else {
            return Err(LifecycleError::wrong_phase(
                "complete_lunch",
                state.phase.as_str(),
            ));
        };
        let lunch = env.catalog().lunch(lunch_id)?;
        choice_index(self.choice, lunch.choices.len()).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error> {
        let Phase::LunchBreak { lunch_id } = &state.phase else {
            return Err(LifecycleError::wrong_phase(
                "complete_lunch",
                state.phase.as_str(),
            ));
        };
        let lunch = env.catalog().lunch(lunch_id)?;
        let choice = &lunch.choices[choice_index(self.choice, lunch.choices.len())?];
        let lunch_id = lunch.id.clone();
        let effect = choice.effect;
        let next = choice.next.clone();

        if let Some(effect) = effect {
            apply_lunch_effect(state, env, effect);
        }
        state.history.past_lunches.push(lunch_id);

        match next {
            Some(next) => {
                env.catalog().lunch(&next)?;
                notices.push(Notice::LunchStarted {
                    lunch_id: next.clone(),
                });
                state.phase = Phase::LunchBreak { lunch_id: next };
            }
            None => {
                state.phase = Phase::ShiftActive;
                state.work.next_spawn_at_ms = state.clock_ms + env.config().spawn_interval_ms;
                notices.push(Notice::LunchEnded);
            }
        }
        Ok(())
    }
}

fn apply_lunch_effect(state: &mut GameState, env: &GameEnv<'_>, effect: LunchEffect) {
    match effect {
        LunchEffect::StressDown => state.meters.stress -= 20,
        LunchEffect::StressUp => state.meters.stress += 10,
        LunchEffect::InfluenceUp => state.meters.influence += 10,
        LunchEffect::UnlockMogUpgrade => {
            state.meters.stress -= 20;
            state.meters.influence += 15;
            state.modifiers.upgrades.push(effect.to_string());
        }
        LunchEffect::SkipTasks => {
            let target = shift::shift_target(state, env);
            let remaining = target.saturating_sub(state.work.processed_in_shift);
            let skipped = remaining.div_ceil(2) + 1;
            state.work.processed_in_shift = (state.work.processed_in_shift + skipped).min(target);
            state.meters.influence += 5;
        }
        LunchEffect::AcceptMogDraft => {
            state.narrative.mog_rapport += 1;
            state.meters.influence += 15;
            state.meters.stress -= 15;
        }
        LunchEffect::RejectMogDraft => {
            state.narrative.mog_rapport = (state.narrative.mog_rapport - 1).max(0);
            state.meters.stress += 5;
        }
        LunchEffect::GainKey => {
            state.narrative.flags |= StoryFlags::BASEMENT_KEY;
            state.meters.influence += 20;
        }
    }
}

// ============================================================================
// Email
// ============================================================================

/// Closes the open email, optionally picking one of its options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CloseEmailAction {
    pub option: Option<usize>,
}

impl CloseEmailAction {
    pub fn new(option: Option<usize>) -> Self {
        Self { option }
    }
}

impl ActionTransition for CloseEmailAction {
    type Error = LifecycleError;
    type Result = ();

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let Phase::EmailModal { email_id } = &state.phase else {
            return Err(LifecycleError::wrong_phase("close_email", state.phase.as_str()));
        };
        let email = env.catalog().email(email_id)?;
        if let Some(option) = self.option {
            choice_index(option, email.options.len())?;
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        _notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error> {
        let Phase::EmailModal { email_id } = &state.phase else {
            return Err(LifecycleError::wrong_phase("close_email", state.phase.as_str()));
        };
        let email = env.catalog().email(email_id)?;
        let effect = match self.option {
            Some(option) => email.options[choice_index(option, email.options.len())?].effect,
            None => None,
        };

        match effect {
            Some(EmailEffect::SignHardship) => {
                state.narrative.flags |= StoryFlags::HARDSHIP;
                state.meters.daily_safety = 100;
                state.meters.stress -= 30;
            }
            Some(EmailEffect::ClipEvidence) => {
                state.narrative.flags |= StoryFlags::CLIPPED_EVIDENCE;
                state.narrative.evidence_count += 1;
                state.meters.safety -= 10;
                state.meters.stress += 10;
            }
            Some(EmailEffect::ReportIncident) => state.meters.safety += 10,
            Some(EmailEffect::Archive) | None => {}
        }

        state.phase = Phase::Standby;
        Ok(())
    }
}

// ============================================================================
// Review
// ============================================================================

/// Answers the end-of-shift review memo and moves on to the next shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReviewDecisionAction {
    pub option: usize,
}

impl ReviewDecisionAction {
    pub fn new(option: usize) -> Self {
        Self { option }
    }
}

impl ActionTransition for ReviewDecisionAction {
    type Error = LifecycleError;
    type Result = ();

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let Phase::Reviewing { memo_id } = &state.phase else {
            return Err(LifecycleError::wrong_phase(
                "review_decision",
                state.phase.as_str(),
            ));
        };
        let memo = env.catalog().memo(memo_id)?;
        choice_index(self.option, memo.options.len()).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error> {
        let Phase::Reviewing { memo_id } = &state.phase else {
            return Err(LifecycleError::wrong_phase(
                "review_decision",
                state.phase.as_str(),
            ));
        };
        let memo = env.catalog().memo(memo_id)?;
        let option = &memo.options[choice_index(self.option, memo.options.len())?];
        let choice = option.choice;
        let delta = option.delta;

        state.weekly.apply(&delta);
        state.meters.stress -= delta.stability;
        state.narrative.evidence_count =
            state.narrative.evidence_count.saturating_add_signed(delta.dossier_count);

        match choice {
            ReviewChoice::Promotion => {
                let promoted = state.rank.promoted();
                if promoted != state.rank {
                    state.rank = promoted;
                    notices.push(Notice::RankChanged { rank: promoted });
                }
            }
            ReviewChoice::HardshipAccept => state.narrative.flags |= StoryFlags::HARDSHIP,
            ReviewChoice::Cooperate
            | ReviewChoice::Refuse
            | ReviewChoice::HardshipReject
            | ReviewChoice::Leak => {}
        }

        shift::advance_shift(state, env, notices);
        Ok(())
    }
}

// ============================================================================
// Pause, sticky notes, reset
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TogglePauseAction;

impl ActionTransition for TogglePauseAction {
    type Error = LifecycleError;
    type Result = bool;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        if state.phase.is_active() && state.work.shift_end.is_idle() {
            Ok(())
        } else {
            Err(LifecycleError::wrong_phase("toggle_pause", state.phase.as_str()))
        }
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error> {
        state.paused = !state.paused;
        notices.push(Notice::Paused(state.paused));
        Ok(state.paused)
    }
}

/// Marks a sticky note as read. Dismissing twice is a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DismissStickyNoteAction {
    pub id: String,
}

impl DismissStickyNoteAction {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl ActionTransition for DismissStickyNoteAction {
    type Error = LifecycleError;
    type Result = ();

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        _notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error> {
        if !state.history.seen_sticky_notes.contains(&self.id) {
            state.history.seen_sticky_notes.push(self.id.clone());
        }
        Ok(())
    }
}

/// Discards the run and starts a fresh one. Valid in every phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResetGameAction;

impl ActionTransition for ResetGameAction {
    type Error = LifecycleError;
    type Result = ();

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        _notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error> {
        let seed = compute_seed(state.seed, state.nonce, RngStream::Reset as u32, 0);
        let use_provider = state.use_provider;
        *state = GameState::new(seed, env.config(), env.catalog().default_rule_ids());
        state.use_provider = use_provider;
        Ok(())
    }
}
