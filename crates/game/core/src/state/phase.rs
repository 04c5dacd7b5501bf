//! Shift lifecycle phases, modal overlays and terminal endings.
//!
//! Exactly one [`Phase`] holds at any time. Pause and the trap/amendment
//! interrupts are overlays that only exist while a shift is active.

/// Mutually exclusive lifecycle phase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Fresh run; the intro sequence has not been acknowledged yet.
    #[default]
    Intro,
    /// Between shifts with an email open.
    EmailModal { email_id: String },
    /// Between shifts, waiting for the player to clock in.
    Standby,
    /// Shift zero: scripted tutorial logs.
    TutorialActive,
    ShiftActive,
    /// Ending overlay shown before finalization.
    ShiftEnding,
    LunchBreak { lunch_id: String },
    Reviewing { memo_id: String },
    GameOver { ending: Ending },
}

impl Phase {
    /// Phases in which logs are presented and acted on.
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::TutorialActive | Phase::ShiftActive)
    }

    /// Phases that belong to an in-progress shift. Never persisted as-is.
    pub fn is_mid_shift(&self) -> bool {
        matches!(
            self,
            Phase::TutorialActive | Phase::ShiftActive | Phase::ShiftEnding | Phase::LunchBreak { .. }
        )
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, Phase::GameOver { .. })
    }

    pub fn ending(&self) -> Option<Ending> {
        match self {
            Phase::GameOver { ending } => Some(*ending),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Intro => "intro",
            Phase::EmailModal { .. } => "email_modal",
            Phase::Standby => "standby",
            Phase::TutorialActive => "tutorial_active",
            Phase::ShiftActive => "shift_active",
            Phase::ShiftEnding => "shift_ending",
            Phase::LunchBreak { .. } => "lunch_break",
            Phase::Reviewing { .. } => "reviewing",
            Phase::GameOver { .. } => "game_over",
        }
    }
}

/// Interrupt that blocks log presentation until the player answers it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Modal {
    Trap { trap_id: String },
    Amendment { amendment_id: String },
}

/// One-shot guard for the shift-end sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShiftEndGuard {
    #[default]
    Idle,
    /// Completion observed; grace delay running.
    Armed { since_ms: u64 },
    /// Ending overlay shown; finalize delay running.
    Ending { since_ms: u64 },
    Finalized,
}

impl ShiftEndGuard {
    pub fn is_idle(&self) -> bool {
        matches!(self, ShiftEndGuard::Idle)
    }
}

/// Career rank. `Subject0` is only reachable through its ending.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    #[default]
    Visitor,
    Observer,
    Liaison,
    Director,
    Subject0,
}

impl Rank {
    /// Next rank reachable through promotion. Never yields `Subject0`.
    pub fn promoted(self) -> Rank {
        match self {
            Rank::Visitor => Rank::Observer,
            Rank::Observer => Rank::Liaison,
            Rank::Liaison | Rank::Director => Rank::Director,
            Rank::Subject0 => Rank::Subject0,
        }
    }
}

/// Terminal outcome of a run.
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
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Ending {
    Fired,
    Subject0,
    Broken,
    OllieAscension,
    Speedrun,
    Overrun,
    Thawed,
    Manager,
    TrueEnding,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_never_reaches_subject_zero() {
        let mut rank = Rank::Visitor;
        for _ in 0..10 {
            rank = rank.promoted();
        }
        assert_eq!(rank, Rank::Director);
        assert!(Rank::Director < Rank::Subject0);
    }

    #[test]
    fn lunch_counts_as_mid_shift_but_not_active() {
        let lunch = Phase::LunchBreak {
            lunch_id: "lunch-01".into(),
        };
        assert!(lunch.is_mid_shift());
        assert!(!lunch.is_active());
        assert!(!Phase::Reviewing { memo_id: "m".into() }.is_mid_shift());
    }
}
