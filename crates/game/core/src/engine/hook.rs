//! Post-execution hooks that apply additional state changes after an intent.
//!
//! Hooks compare the state before and after the transition and react to what
//! changed: stress hitting the ceiling, an ending condition, a log waiting to
//! be presented.

use std::sync::Arc;

use crate::action::Notice;
use crate::config::GameConfig;
use crate::endings;
use crate::env::GameEnv;
use crate::shift;
use crate::state::GameState;

/// A hook that is applied after an intent has been executed.
///
/// Hooks are executed in priority order (lower priority values execute first).
pub trait PostExecutionHook: Send + Sync {
    /// Returns the priority of this hook. Lower values execute first.
    /// Default priority is 0.
    fn priority(&self) -> i32 {
        0
    }

    fn name(&self) -> &'static str;

    /// Determines whether this hook should be triggered for this transition.
    fn should_trigger(&self, before: &GameState, after: &GameState) -> bool;

    /// Applies the hook's effects to the game state directly.
    fn apply(
        &self,
        before: &GameState,
        state: &mut GameState,
        env: &GameEnv<'_>,
        notices: &mut Vec<Notice>,
    );
}

/// Counts every time stress newly reaches the ceiling.
#[derive(Debug)]
pub struct StressMaxHook;

impl PostExecutionHook for StressMaxHook {
    fn priority(&self) -> i32 {
        // Must run before the ending check so the third hit ends the run.
        -10
    }

    fn name(&self) -> &'static str {
        "stress_max"
    }

    fn should_trigger(&self, before: &GameState, after: &GameState) -> bool {
        before.meters.stress < GameConfig::METER_MAX
            && after.meters.stress >= GameConfig::METER_MAX
            && !after.is_game_over()
    }

    fn apply(
        &self,
        _before: &GameState,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        notices: &mut Vec<Notice>,
    ) {
        state.stress_max_hits += 1;
        notices.push(Notice::StressMaxed {
            hits: state.stress_max_hits,
        });
    }
}

/// Freezes the run as soon as an immediate ending condition holds.
#[derive(Debug)]
pub struct EndingHook;

impl PostExecutionHook for EndingHook {
    fn name(&self) -> &'static str {
        "ending"
    }

    fn should_trigger(&self, _before: &GameState, after: &GameState) -> bool {
        !after.is_game_over() && endings::check(after).is_some()
    }

    fn apply(
        &self,
        _before: &GameState,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        notices: &mut Vec<Notice>,
    ) {
        if let Some(ending) = endings::check(state) {
            endings::conclude(state, ending, notices);
        }
    }
}

/// Presents queued logs, calls lunch and arms the shift end.
#[derive(Debug)]
pub struct SettleHook;

impl PostExecutionHook for SettleHook {
    fn priority(&self) -> i32 {
        10
    }

    fn name(&self) -> &'static str {
        "settle"
    }

    fn should_trigger(&self, _before: &GameState, after: &GameState) -> bool {
        after.is_interactive()
    }

    fn apply(
        &self,
        _before: &GameState,
        state: &mut GameState,
        env: &GameEnv<'_>,
        notices: &mut Vec<Notice>,
    ) {
        shift::settle(state, env, notices);
    }
}

/// Returns the default set of hooks that should be applied after every intent.
/// Hooks are returned in an Arc for efficient sharing without cloning.
pub fn default_hooks() -> Arc<[Arc<dyn PostExecutionHook>]> {
    let mut hooks: Vec<Arc<dyn PostExecutionHook>> =
        vec![Arc::new(SettleHook), Arc::new(EndingHook), Arc::new(StressMaxHook)];
    hooks.sort_by_key(|hook| hook.priority());
    hooks.into()
}
