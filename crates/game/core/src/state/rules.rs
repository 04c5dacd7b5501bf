//! Rulebook and modifier state.

use crate::env::{EventKind, TrapEffect};

/// A signed amendment. At most one per rule.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveAmendment {
    pub id: String,
    pub rule_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuleState {
    /// Ordered; traps may shuffle it.
    pub active: Vec<String>,
    /// Decayed rules. Display only.
    pub rotted: Vec<String>,
    pub amendments: Vec<ActiveAmendment>,
    /// `total_logs_processed` when the last amendment was decided.
    pub logs_at_last_amendment: u32,
    pub next_rot_at_ms: u64,
}

impl RuleState {
    pub fn is_amended(&self, rule_id: &str) -> bool {
        self.amendments.iter().any(|a| a.rule_id == rule_id)
    }

    pub fn is_amendment_active(&self, amendment_id: &str) -> bool {
        self.amendments.iter().any(|a| a.id == amendment_id)
    }
}

/// Transient event counted down per player action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveEvent {
    pub id: String,
    pub kind: EventKind,
    pub remaining: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Modifiers {
    /// Accepted trap ids, in acceptance order.
    pub traps: Vec<String>,
    /// Effects of the accepted traps, kept alongside for quick checks.
    pub trap_effects: Vec<TrapEffect>,
    pub upgrades: Vec<String>,
    pub event: Option<ActiveEvent>,
    pub last_event_at_ms: Option<u64>,
}

impl Modifiers {
    pub fn event_is(&self, kind: EventKind) -> bool {
        self.event.as_ref().is_some_and(|event| event.kind == kind)
    }

    pub fn has_trap(&self, effect: TrapEffect) -> bool {
        self.trap_effects.contains(&effect)
    }

    /// Counts one player action against the active event.
    pub fn tick_event(&mut self) -> Option<ActiveEvent> {
        let event = self.event.as_mut()?;
        event.remaining = event.remaining.saturating_sub(1);
        if event.remaining == 0 {
            return self.event.take();
        }
        None
    }
}
