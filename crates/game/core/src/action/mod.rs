//! Intent domain.
//!
//! Every state change is requested through an [`Intent`]. Player intents come
//! from the presentation layer; system intents come from the runtime's timers
//! and content provider. Each intent maps to one [`ActionTransition`] that the
//! engine drives through `pre_validate → apply → post_validate`.
//!
//! # Module Structure
//!
//! - `error`: intent error families (resolve, lifecycle, modal, system)
//! - `resolve`: LOG / CONTAIN / DEFER / FREE / FORGET resolution
//! - `modal`: trap and amendment answers
//! - `lifecycle`: intro, shift start, lunch, email, review, pause, reset
//! - `system`: game-clock ticks and generated-log delivery

pub mod error;
pub mod lifecycle;
pub mod modal;
pub mod resolve;
pub mod system;

pub use error::{LifecycleError, ModalError, ResolveError, SystemError};
pub use lifecycle::{
    CloseEmailAction, CompleteIntroAction, CompleteLunchAction, DismissStickyNoteAction,
    ResetGameAction, ReviewDecisionAction, StartShiftAction, TogglePauseAction,
};
pub use modal::{AcceptTrapAction, RejectTrapAction, SignAmendmentAction, VetoAmendmentAction};
pub use resolve::PerformAction;
pub use system::{EnqueueLogAction, ProviderTelemetry, TickAction};

use crate::env::GameEnv;
use crate::state::{Ending, GameState, InvariantViolation, Rank};

/// Triage verdict chosen by the player.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PlayerAction {
    /// Archive the log as compliant.
    Log,
    /// Flag the log as a rule violation.
    Contain,
    /// Push the log and its neighbours out of the queue.
    Defer,
    /// Ollie mode only.
    Free,
    /// Ollie mode only.
    Forget,
}

/// Optional input attached to a triage action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionExtra {
    /// Words the player blacked out during a redaction event.
    pub redaction_count: u32,
}

/// Defines how a concrete intent mutates game state.
///
/// Transitions push [`Notice`]s for everything the runtime should react to
/// (spawn requests, phase changes, endings). The engine clamps meters between
/// `apply` and `post_validate`, so `post_validate` sees a normalized state.
pub trait ActionTransition {
    type Error: From<InvariantViolation>;
    type Result;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the intent by mutating the game state directly.
    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        state.validate().map_err(Into::into)
    }
}

/// Intents issued by the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerIntent {
    CompleteIntro(CompleteIntroAction),
    StartShift(StartShiftAction),
    Perform(PerformAction),
    AcceptTrap(AcceptTrapAction),
    RejectTrap(RejectTrapAction),
    SignAmendment(SignAmendmentAction),
    VetoAmendment(VetoAmendmentAction),
    CompleteLunch(CompleteLunchAction),
    CloseEmail(CloseEmailAction),
    MakeReviewDecision(ReviewDecisionAction),
    TogglePause(TogglePauseAction),
    DismissStickyNote(DismissStickyNoteAction),
    ResetGame(ResetGameAction),
}

/// Intents issued by the runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemIntent {
    Tick(TickAction),
    EnqueueLog(EnqueueLogAction),
}

/// Top-level intent routed through [`crate::engine::GameEngine`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    Player(PlayerIntent),
    System(SystemIntent),
}

impl Intent {
    pub fn perform(action: PlayerAction) -> Self {
        Self::Player(PlayerIntent::Perform(PerformAction::new(action)))
    }

    pub fn tick(elapsed_ms: u64) -> Self {
        Self::System(SystemIntent::Tick(TickAction { elapsed_ms }))
    }

    /// True for intents that replace the whole run.
    pub fn is_reset(&self) -> bool {
        matches!(self, Intent::Player(PlayerIntent::ResetGame(_)))
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Player(intent) => match intent {
                PlayerIntent::CompleteIntro(_) => "complete_intro",
                PlayerIntent::StartShift(_) => "start_shift",
                PlayerIntent::Perform(_) => "perform",
                PlayerIntent::AcceptTrap(_) => "accept_trap",
                PlayerIntent::RejectTrap(_) => "reject_trap",
                PlayerIntent::SignAmendment(_) => "sign_amendment",
                PlayerIntent::VetoAmendment(_) => "veto_amendment",
                PlayerIntent::CompleteLunch(_) => "complete_lunch",
                PlayerIntent::CloseEmail(_) => "close_email",
                PlayerIntent::MakeReviewDecision(_) => "review_decision",
                PlayerIntent::TogglePause(_) => "toggle_pause",
                PlayerIntent::DismissStickyNote(_) => "dismiss_sticky_note",
                PlayerIntent::ResetGame(_) => "reset_game",
            },
            Intent::System(intent) => match intent {
                SystemIntent::Tick(_) => "tick",
                SystemIntent::EnqueueLog(_) => "enqueue_log",
            },
        }
    }
}

impl From<PlayerIntent> for Intent {
    fn from(intent: PlayerIntent) -> Self {
        Intent::Player(intent)
    }
}

impl From<SystemIntent> for Intent {
    fn from(intent: SystemIntent) -> Self {
        Intent::System(intent)
    }
}

/// Side-effect announcement produced by a transition.
///
/// The core never performs I/O; the runtime turns notices into log lines,
/// bus events and spawn requests.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notice {
    /// The shift wants another log from the content provider.
    SpawnDue,
    LogPresented { id: String },
    LogEnqueued { id: String },
    ShiftStarted { shift_index: u32 },
    LunchStarted { lunch_id: String },
    LunchEnded,
    ShiftEndArmed,
    ShiftEnding,
    ShiftFinalized { shift_index: u32 },
    ReviewOpened { memo_id: String },
    EmailOpened { email_id: String },
    EventStarted { event_id: String },
    EventExpired { event_id: String },
    TrapOffered { trap_id: String },
    AmendmentProposed { amendment_id: String },
    RuleRotted { rule_id: String },
    StressMaxed { hits: u32 },
    RankChanged { rank: Rank },
    OllieModeEnabled,
    Paused(bool),
    GameOver { ending: Ending },
}
