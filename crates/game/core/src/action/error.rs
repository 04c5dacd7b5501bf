//! Intent errors.
//!
//! One enum per intent family. Phase mismatches are `Validation` errors the
//! runtime drops quietly; invariant failures are `Internal`.

use crate::env::CatalogError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::InvariantViolation;

// ============================================================================
// Triage Errors
// ============================================================================

/// Errors raised while resolving a triage action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No shift is running.
    #[error("no shift is active (phase {0})")]
    NotActive(&'static str),

    /// A trap or amendment is waiting for an answer.
    #[error("a modal interrupt is open")]
    ModalOpen,

    #[error("the shift is paused")]
    Paused,

    /// Stress is maxed; only DEFER is accepted.
    #[error("stress is maxed, only DEFER is accepted")]
    StressLocked,

    #[error("action {0} is only available in Ollie mode")]
    OllieModeOnly(&'static str),

    #[error("no log is presented")]
    NoLogPresented,

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl GameError for ResolveError {
    fn severity(&self) -> ErrorSeverity {
        use ResolveError::*;
        match self {
            ModalOpen | Paused | StressLocked | NoLogPresented => ErrorSeverity::Recoverable,
            NotActive(_) | OllieModeOnly(_) => ErrorSeverity::Validation,
            Invariant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use ResolveError::*;
        match self {
            NotActive(_) => "RESOLVE_NOT_ACTIVE",
            ModalOpen => "RESOLVE_MODAL_OPEN",
            Paused => "RESOLVE_PAUSED",
            StressLocked => "RESOLVE_STRESS_LOCKED",
            OllieModeOnly(_) => "RESOLVE_OLLIE_MODE_ONLY",
            NoLogPresented => "RESOLVE_NO_LOG",
            Invariant(_) => "RESOLVE_INVARIANT",
        }
    }
}

// ============================================================================
// Lifecycle Errors
// ============================================================================

/// Errors raised by phase transitions between and around shifts.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// Intent does not apply to the current phase.
    #[error("{intent} is not valid during {phase}")]
    WrongPhase {
        intent: &'static str,
        phase: &'static str,
    },

    #[error("option {index} is out of range ({available} available)")]
    InvalidChoice { index: usize, available: usize },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl LifecycleError {
    pub fn wrong_phase(intent: &'static str, phase: &'static str) -> Self {
        Self::WrongPhase { intent, phase }
    }
}

impl GameError for LifecycleError {
    fn severity(&self) -> ErrorSeverity {
        use LifecycleError::*;
        match self {
            WrongPhase { .. } | InvalidChoice { .. } => ErrorSeverity::Validation,
            Catalog(_) | Invariant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use LifecycleError::*;
        match self {
            WrongPhase { .. } => "LIFECYCLE_WRONG_PHASE",
            InvalidChoice { .. } => "LIFECYCLE_INVALID_CHOICE",
            Catalog(_) => "LIFECYCLE_CATALOG",
            Invariant(_) => "LIFECYCLE_INVARIANT",
        }
    }
}

// ============================================================================
// Modal Errors
// ============================================================================

/// Errors raised while answering a trap offer or an amendment proposal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModalError {
    #[error("no trap offer is pending")]
    NoPendingTrap,

    #[error("no amendment proposal is pending")]
    NoPendingAmendment,

    /// Amendments never stack on one rule.
    #[error("rule {0} already carries an amendment")]
    RuleAlreadyAmended(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl GameError for ModalError {
    fn severity(&self) -> ErrorSeverity {
        use ModalError::*;
        match self {
            NoPendingTrap | NoPendingAmendment => ErrorSeverity::Validation,
            RuleAlreadyAmended(_) => ErrorSeverity::Validation,
            Catalog(_) | Invariant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use ModalError::*;
        match self {
            NoPendingTrap => "MODAL_NO_TRAP",
            NoPendingAmendment => "MODAL_NO_AMENDMENT",
            RuleAlreadyAmended(_) => "MODAL_RULE_AMENDED",
            Catalog(_) => "MODAL_CATALOG",
            Invariant(_) => "MODAL_INVARIANT",
        }
    }
}

// ============================================================================
// System Errors
// ============================================================================

/// Errors raised by runtime-issued intents.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SystemError {
    /// Generated log belongs to a shift that has already ended.
    #[error("stale spawn for shift serial {got} (current {current})")]
    StaleSpawn { got: u64, current: u64 },

    #[error("cannot enqueue logs during {0}")]
    IncompatiblePhase(&'static str),

    #[error("queue is full")]
    QueueFull,

    /// The shift already holds every log it will process.
    #[error("shift quota already committed")]
    QuotaMet,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl GameError for SystemError {
    fn severity(&self) -> ErrorSeverity {
        use SystemError::*;
        match self {
            StaleSpawn { .. } | IncompatiblePhase(_) | QueueFull | QuotaMet => {
                ErrorSeverity::Recoverable
            }
            Catalog(_) | Invariant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use SystemError::*;
        match self {
            StaleSpawn { .. } => "SYSTEM_STALE_SPAWN",
            IncompatiblePhase(_) => "SYSTEM_INCOMPATIBLE_PHASE",
            QueueFull => "SYSTEM_QUEUE_FULL",
            QuotaMet => "SYSTEM_QUOTA_MET",
            Catalog(_) => "SYSTEM_CATALOG",
            Invariant(_) => "SYSTEM_INVARIANT",
        }
    }
}
