//! Intent dispatch and execution logic.

use crate::action::{ActionTransition, Intent, Notice, PlayerIntent, SystemIntent};
use crate::env::GameEnv;
use crate::state::{Feedback, GameState};

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline and returns the result.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the game state and return result
/// 3. `post_validate` - Verify postconditions on the clamped state
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut GameState,
    env: &GameEnv<'_>,
    notices: &mut Vec<Notice>,
) -> Result<T::Result, TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let result = transition
        .apply(state, env, notices)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    state.meters.clamp();

    transition
        .post_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(result)
}

/// Routes an intent to its transition. Returns triage feedback when the
/// intent was a LOG / CONTAIN / DEFER.
pub(super) fn execute_transition(
    intent: &Intent,
    state: &mut GameState,
    env: &GameEnv<'_>,
    notices: &mut Vec<Notice>,
) -> Result<Option<Feedback>, ExecuteError> {
    match intent {
        Intent::Player(intent) => match intent {
            PlayerIntent::Perform(transition) => {
                let feedback = drive_transition(transition, state, env, notices)
                    .map_err(ExecuteError::Resolve)?;
                Ok(Some(feedback))
            }
            PlayerIntent::AcceptTrap(transition) => {
                drive_transition(transition, state, env, notices).map_err(ExecuteError::Modal)?;
                Ok(None)
            }
            PlayerIntent::RejectTrap(transition) => {
                drive_transition(transition, state, env, notices).map_err(ExecuteError::Modal)?;
                Ok(None)
            }
            PlayerIntent::SignAmendment(transition) => {
                drive_transition(transition, state, env, notices).map_err(ExecuteError::Modal)?;
                Ok(None)
            }
            PlayerIntent::VetoAmendment(transition) => {
                drive_transition(transition, state, env, notices).map_err(ExecuteError::Modal)?;
                Ok(None)
            }
            PlayerIntent::CompleteIntro(transition) => lifecycle(transition, state, env, notices),
            PlayerIntent::StartShift(transition) => lifecycle(transition, state, env, notices),
            PlayerIntent::CompleteLunch(transition) => lifecycle(transition, state, env, notices),
            PlayerIntent::CloseEmail(transition) => lifecycle(transition, state, env, notices),
            PlayerIntent::MakeReviewDecision(transition) => {
                lifecycle(transition, state, env, notices)
            }
            PlayerIntent::TogglePause(transition) => {
                drive_transition(transition, state, env, notices)
                    .map_err(ExecuteError::Lifecycle)?;
                Ok(None)
            }
            PlayerIntent::DismissStickyNote(transition) => {
                lifecycle(transition, state, env, notices)
            }
            PlayerIntent::ResetGame(transition) => lifecycle(transition, state, env, notices),
        },
        Intent::System(intent) => match intent {
            SystemIntent::Tick(transition) => {
                drive_transition(transition, state, env, notices).map_err(ExecuteError::System)?;
                Ok(None)
            }
            SystemIntent::EnqueueLog(transition) => {
                drive_transition(transition, state, env, notices).map_err(ExecuteError::System)?;
                Ok(None)
            }
        },
    }
}

fn lifecycle<T>(
    transition: &T,
    state: &mut GameState,
    env: &GameEnv<'_>,
    notices: &mut Vec<Notice>,
) -> Result<Option<Feedback>, ExecuteError>
where
    T: ActionTransition<Error = crate::action::LifecycleError, Result = ()>,
{
    drive_transition(transition, state, env, notices).map_err(ExecuteError::Lifecycle)?;
    Ok(None)
}
