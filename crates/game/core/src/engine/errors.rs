//! Error types for the intent execution pipeline.

use crate::action::{ActionTransition, LifecycleError, ModalError, PerformAction, SystemError};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Ending, InvariantViolation};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors surfaced while executing an intent through the game engine.
///
/// A failed intent leaves no trace: the runtime executes on a working copy
/// and only commits it on success.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("triage action failed: {0}")]
    Resolve(TransitionPhaseError<<PerformAction as ActionTransition>::Error>),

    #[error("lifecycle intent failed: {0}")]
    Lifecycle(TransitionPhaseError<LifecycleError>),

    #[error("modal answer failed: {0}")]
    Modal(TransitionPhaseError<ModalError>),

    #[error("system intent failed: {0}")]
    System(TransitionPhaseError<SystemError>),

    /// Hooks left the state inconsistent.
    #[error("post-execution hooks broke an invariant: {0}")]
    Hook(InvariantViolation),

    /// The run is over; only a reset is accepted.
    #[error("run ended with {ending}; only a reset is accepted")]
    Frozen { ending: Ending },
}

impl ExecuteError {
    /// Phase that rejected the intent, when it came from a transition.
    pub fn phase(&self) -> Option<TransitionPhase> {
        match self {
            ExecuteError::Resolve(err) => Some(err.phase),
            ExecuteError::Lifecycle(err) => Some(err.phase),
            ExecuteError::Modal(err) => Some(err.phase),
            ExecuteError::System(err) => Some(err.phase),
            ExecuteError::Hook(_) | ExecuteError::Frozen { .. } => None,
        }
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ExecuteError::Resolve(err) => err.error.severity(),
            ExecuteError::Lifecycle(err) => err.error.severity(),
            ExecuteError::Modal(err) => err.error.severity(),
            ExecuteError::System(err) => err.error.severity(),
            ExecuteError::Hook(_) => ErrorSeverity::Internal,
            ExecuteError::Frozen { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ExecuteError::Resolve(err) => err.error.error_code(),
            ExecuteError::Lifecycle(err) => err.error.error_code(),
            ExecuteError::Modal(err) => err.error.error_code(),
            ExecuteError::System(err) => err.error.error_code(),
            ExecuteError::Hook(_) => "ENGINE_HOOK_INVARIANT",
            ExecuteError::Frozen { .. } => "ENGINE_FROZEN",
        }
    }
}
