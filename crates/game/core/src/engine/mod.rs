//! Intent execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. It
//! orchestrates the transition phases, runs the post-execution hooks and
//! surfaces rich error information for the runtime. Player intents and
//! runtime intents (ticks, generated logs) flow through the same
//! `execute()` pipeline.

mod errors;
mod hook;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};
pub use hook::{EndingHook, PostExecutionHook, SettleHook, StressMaxHook, default_hooks};

use std::sync::Arc;

use crate::action::{Intent, Notice};
use crate::env::GameEnv;
use crate::state::{Feedback, GameState};

/// Complete outcome of intent execution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionOutcome {
    /// Nonce the intent was applied at.
    pub nonce: u64,

    /// Triage feedback. `None` for everything but LOG / CONTAIN / DEFER.
    pub feedback: Option<Feedback>,

    /// Side effects for the runtime, in the order they happened.
    pub notices: Vec<Notice>,
}

impl ExecutionOutcome {
    pub fn has(&self, predicate: impl Fn(&Notice) -> bool) -> bool {
        self.notices.iter().any(predicate)
    }
}

/// Game engine that applies intents to a borrowed state.
///
/// All state mutations flow through the three-phase pipeline:
/// pre_validate → apply → post_validate, followed by the hooks.
///
/// A rejected intent may leave `state` partially mutated. Callers that need
/// atomicity run the engine on a working copy and commit it on success.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
    hooks: Arc<[Arc<dyn PostExecutionHook>]>,
}

impl<'a> GameEngine<'a> {
    /// Creates a new game engine with the default hooks.
    pub fn new(state: &'a mut GameState) -> Self {
        Self::with_hooks(state, default_hooks())
    }

    pub fn with_hooks(state: &'a mut GameState, hooks: Arc<[Arc<dyn PostExecutionHook>]>) -> Self {
        Self { state, hooks }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Executes an intent by routing it through the appropriate transition pipeline.
    ///
    /// Once the run is over every intent but a reset is rejected.
    pub fn execute(
        &mut self,
        env: GameEnv<'_>,
        intent: &Intent,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        if let Some(ending) = self.state.phase.ending() {
            if !intent.is_reset() {
                return Err(ExecuteError::Frozen { ending });
            }
        }

        let before = self.state.clone();
        let mut notices = Vec::new();

        let feedback = transition::execute_transition(intent, self.state, &env, &mut notices)?;

        for hook in self.hooks.iter() {
            if hook.should_trigger(&before, self.state) {
                hook.apply(&before, self.state, &env, &mut notices);
            }
        }
        self.state.meters.clamp();
        self.state.validate().map_err(ExecuteError::Hook)?;

        let nonce = self.state.nonce;
        self.state.nonce += 1;

        Ok(ExecutionOutcome {
            nonce,
            feedback,
            notices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{PlayerAction, PlayerIntent, ResetGameAction};
    use crate::state::{Ending, Phase, ShiftEndGuard};
    use crate::testing::{Fixture, active_state, safe_log};

    fn execute(
        state: &mut GameState,
        fixture: &Fixture,
        intent: Intent,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        GameEngine::new(state).execute(fixture.env(), &intent)
    }

    #[test]
    fn last_log_arms_the_shift_end_exactly_once() {
        let fixture = Fixture::new();
        let mut state = active_state(&fixture);
        state.work.lunch_taken = true;
        state.work.processed_in_shift = 7;
        state.work.current = Some(safe_log("last"));

        let outcome = execute(&mut state, &fixture, Intent::perform(PlayerAction::Log))
            .expect("log accepted");
        assert!(outcome.feedback.as_ref().is_some_and(|feedback| feedback.is_correct()));
        assert!(outcome.has(|notice| *notice == Notice::ShiftEndArmed));

        // Further ticks walk the guard, never re-arming it.
        let outcome = execute(&mut state, &fixture, Intent::tick(2_500)).expect("tick");
        assert!(!outcome.has(|notice| *notice == Notice::ShiftEndArmed));
        assert_eq!(state.phase, Phase::ShiftEnding);

        let outcome = execute(&mut state, &fixture, Intent::tick(4_000)).expect("tick");
        assert!(outcome.has(|notice| matches!(notice, Notice::ShiftFinalized { .. })));
        assert_eq!(state.work.shift_end, ShiftEndGuard::Finalized);
        assert!(matches!(state.phase, Phase::Reviewing { .. }));

        let error = execute(&mut state, &fixture, Intent::perform(PlayerAction::Log))
            .expect_err("no shift is running");
        assert_eq!(error.phase(), Some(TransitionPhase::PreValidate));
    }

    #[test]
    fn rejected_intent_keeps_the_nonce() {
        let fixture = Fixture::new();
        let mut state = active_state(&fixture);
        state.phase = Phase::Standby;
        assert!(execute(&mut state, &fixture, Intent::perform(PlayerAction::Defer)).is_err());
        assert_eq!(state.nonce, 0);

        execute(&mut state, &fixture, Intent::tick(10)).expect("tick");
        assert_eq!(state.nonce, 1);
    }

    #[test]
    fn full_influence_freezes_the_run() {
        let fixture = Fixture::new();
        let mut state = active_state(&fixture);
        state.meters.influence = 100;

        let outcome = execute(&mut state, &fixture, Intent::tick(10)).expect("tick");
        assert!(outcome.has(|notice| *notice
            == Notice::GameOver {
                ending: Ending::Subject0
            }));
        assert_eq!(state.phase.ending(), Some(Ending::Subject0));

        assert_eq!(
            execute(&mut state, &fixture, Intent::tick(10)),
            Err(ExecuteError::Frozen {
                ending: Ending::Subject0
            })
        );

        let reset = Intent::Player(PlayerIntent::ResetGame(ResetGameAction));
        execute(&mut state, &fixture, reset).expect("reset is always accepted");
        assert_eq!(state.phase, Phase::Intro);
    }

    #[test]
    fn third_stress_max_breaks_the_player() {
        let fixture = Fixture::new();
        let mut state = active_state(&fixture);
        state.stress_max_hits = 2;
        state.meters.stress = 99;
        state.work.current = Some(safe_log("c"));
        for index in 0..5 {
            state.work.queue.push_back(safe_log(&format!("q{index}")));
        }

        let outcome = execute(&mut state, &fixture, Intent::tick(10)).expect("tick");

        assert_eq!(state.stress_max_hits, 3);
        assert!(outcome.has(|notice| *notice == Notice::StressMaxed { hits: 3 }));
        assert_eq!(state.phase.ending(), Some(Ending::Broken));
    }

    #[test]
    fn staying_at_max_stress_is_not_a_new_hit() {
        let fixture = Fixture::new();
        let mut state = active_state(&fixture);
        state.meters.stress = 100;
        state.work.current = Some(safe_log("c"));
        for index in 0..5 {
            state.work.queue.push_back(safe_log(&format!("q{index}")));
        }
        execute(&mut state, &fixture, Intent::tick(10)).expect("tick");
        assert_eq!(state.stress_max_hits, 0);
        assert_eq!(state.meters.stress, 100);
    }

    #[test]
    fn meters_stay_in_range_after_every_intent() {
        let fixture = Fixture::new();
        let mut state = active_state(&fixture);
        state.work.queue.push_back(safe_log("a"));
        state.work.queue.push_back(safe_log("b"));

        let intents = [
            Intent::tick(10),
            Intent::perform(PlayerAction::Contain),
            Intent::perform(PlayerAction::Contain),
            Intent::perform(PlayerAction::Defer),
            Intent::tick(2_000),
            Intent::tick(2_000),
        ];
        for intent in intents {
            let _ = execute(&mut state, &fixture, intent);
            assert!(state.meters.in_range());
            assert!(state.validate().is_ok());
        }
    }
}
