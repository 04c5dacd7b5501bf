//! Interaction history and player-facing feedback.

use std::collections::BTreeSet;

use crate::action::PlayerAction;

use super::ExhibitId;

/// One resolved player action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interaction {
    /// The action after any event remap.
    pub action: PlayerAction,
    pub exhibit: ExhibitId,
    /// Game clock at resolution time.
    pub at_ms: u64,
    pub was_correct: bool,
    pub snippet: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct History {
    pub last_interaction: Option<Interaction>,
    /// Append-only.
    pub interactions: Vec<Interaction>,
    pub seen_sticky_notes: Vec<String>,
    pub seen_log_ids: BTreeSet<String>,
    pub past_lunches: Vec<String>,
}

impl History {
    pub fn record(&mut self, interaction: Interaction) {
        self.last_interaction = Some(interaction.clone());
        self.interactions.push(interaction);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verdict {
    Correct,
    Wrong,
    /// Deferred logs are never judged.
    Neutral,
}

/// Message shown after a resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feedback {
    pub verdict: Verdict,
    pub message: String,
}

impl Feedback {
    pub fn correct(message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Correct,
            message: message.into(),
        }
    }

    pub fn wrong(message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Wrong,
            message: message.into(),
        }
    }

    pub fn neutral(message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Neutral,
            message: message.into(),
        }
    }

    pub fn is_correct(&self) -> bool {
        self.verdict == Verdict::Correct
    }
}
