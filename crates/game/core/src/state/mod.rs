//! Authoritative game state representation.
//!
//! A single aggregate owned by the engine. Runtime layers clone or query it
//! but mutate it exclusively through intents. Every nested struct defaults
//! field by field so that an older save blob still loads.
mod history;
mod log;
mod meters;
mod narrative;
mod phase;
mod rules;
mod stats;
mod work;

pub use history::{Feedback, History, Interaction, Verdict};
pub use log::{ExhibitId, HazardTags, LogItem, content_id};
pub use meters::{MeterDelta, Meters};
pub use narrative::{Narrative, StoryFlags};
pub use phase::{Ending, Modal, Phase, Rank, ShiftEndGuard};
pub use rules::{ActiveAmendment, ActiveEvent, Modifiers, RuleState};
pub use stats::{SessionStats, WeeklyDelta, WeeklyStats};
pub use work::{Streak, WorkState};

use crate::config::GameConfig;

/// Broken state invariant detected after a transition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("meter outside [0, 100]")]
    MeterOutOfRange,

    #[error("modal overlay open during {0}")]
    ModalOutsideShift(&'static str),

    #[error("pause flag set during {0}")]
    PauseOutsideShift(&'static str),

    #[error("log presented during {0}")]
    PresentedOutsideShift(&'static str),

    #[error("queue holds {0} logs, above capacity")]
    QueueOverflow(usize),

    #[error("rule {0} carries more than one amendment")]
    StackedAmendment(String),
}

/// Canonical snapshot of the game.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameState {
    pub run_id: String,
    /// Base seed for all dice rolls; combined with `nonce` per intent.
    pub seed: u64,
    /// Number of intents applied so far.
    pub nonce: u64,
    /// Game-time milliseconds, advanced by ticks.
    pub clock_ms: u64,
    pub shift_index: u32,
    pub rank: Rank,
    pub meters: Meters,
    pub phase: Phase,
    pub modal: Option<Modal>,
    pub paused: bool,
    pub work: WorkState,
    pub streak: Streak,
    pub rules: RuleState,
    pub modifiers: Modifiers,
    pub narrative: Narrative,
    pub history: History,
    pub last_feedback: Option<Feedback>,
    pub stats: SessionStats,
    pub weekly: WeeklyStats,
    pub use_provider: bool,
    pub has_seen_intro: bool,
    pub stress_max_hits: u32,
    pub total_logs_processed: u32,
    pub total_contains: u32,
}

impl GameState {
    /// Creates a fresh run.
    pub fn new(seed: u64, config: &GameConfig, default_rules: Vec<String>) -> Self {
        Self {
            run_id: format!("run-{seed:016x}"),
            seed,
            nonce: 0,
            clock_ms: 0,
            shift_index: 0,
            rank: Rank::Visitor,
            meters: Meters::new(config.initial_safety),
            phase: Phase::Intro,
            modal: None,
            paused: false,
            work: WorkState::default(),
            streak: Streak::default(),
            rules: RuleState {
                active: default_rules,
                ..RuleState::default()
            },
            modifiers: Modifiers::default(),
            narrative: Narrative::default(),
            history: History::default(),
            last_feedback: None,
            stats: SessionStats::default(),
            weekly: WeeklyStats::default(),
            use_provider: false,
            has_seen_intro: false,
            stress_max_hits: 0,
            total_logs_processed: 0,
            total_contains: 0,
        }
    }

    /// Shift zero is the tutorial.
    pub fn is_tutorial(&self) -> bool {
        self.shift_index == 0
    }

    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    /// True when a shift is active and nothing blocks the player.
    pub fn is_interactive(&self) -> bool {
        self.phase.is_active() && !self.paused && self.modal.is_none()
    }

    /// Whether the state may be persisted. Mid-shift states never are.
    pub fn is_safe_checkpoint(&self) -> bool {
        self.has_seen_intro && !self.phase.is_mid_shift()
    }

    /// Normalizes a loaded save: drops every transient and modal field.
    ///
    /// A save taken mid-shift resumes between shifts so the player restarts
    /// that shift cleanly. A pending review keeps the finished shift's
    /// meters, since its decision carries daily safety into the career
    /// meter. Rules missing from an old blob are refilled.
    #[must_use]
    pub fn resumed(mut self, default_rules: &[String]) -> Self {
        if self.phase.is_mid_shift() {
            self.phase = Phase::Standby;
        }
        self.modal = None;
        self.paused = false;
        self.work.reset_for_shift();
        self.modifiers.event = None;
        if !matches!(self.phase, Phase::Reviewing { .. }) {
            self.meters.stress = 0;
            self.meters.daily_safety = GameConfig::METER_MAX;
        }
        self.last_feedback = None;
        if self.rules.active.is_empty() {
            self.rules.active = default_rules.to_vec();
        }
        self.meters.clamp();
        self
    }

    /// Checks the invariants every transition must preserve.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if !self.meters.in_range() {
            return Err(InvariantViolation::MeterOutOfRange);
        }
        let active = self.phase.is_active();
        if self.modal.is_some() && !active {
            return Err(InvariantViolation::ModalOutsideShift(self.phase.as_str()));
        }
        if self.paused && !active {
            return Err(InvariantViolation::PauseOutsideShift(self.phase.as_str()));
        }
        if self.work.current.is_some() && !active {
            return Err(InvariantViolation::PresentedOutsideShift(self.phase.as_str()));
        }
        if self.work.queue.len() > GameConfig::MAX_QUEUE {
            return Err(InvariantViolation::QueueOverflow(self.work.queue.len()));
        }
        for (index, amendment) in self.rules.amendments.iter().enumerate() {
            if self.rules.amendments[..index]
                .iter()
                .any(|earlier| earlier.rule_id == amendment.rule_id)
            {
                return Err(InvariantViolation::StackedAmendment(
                    amendment.rule_id.clone(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(0, &GameConfig::default(), Vec::new())
    }
}
