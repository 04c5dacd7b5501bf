//! Per-shift work queue bookkeeping.

use std::collections::VecDeque;

use super::{LogItem, ShiftEndGuard};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorkState {
    /// Logs awaiting presentation, bounded by `GameConfig::MAX_QUEUE`.
    pub queue: VecDeque<LogItem>,
    /// The log the player is currently looking at.
    pub current: Option<LogItem>,
    pub processed_in_shift: u32,
    pub defer_count_global: u32,
    pub defer_count_shift: u32,
    pub lunch_taken: bool,
    /// Bumped at every shift start; spawns planned for an older serial are stale.
    pub shift_serial: u64,
    pub next_spawn_at_ms: u64,
    /// Next scheduler poll (stress drift, amendment and event rolls).
    pub next_poll_at_ms: u64,
    pub shift_end: ShiftEndGuard,
}

impl WorkState {
    /// Logs already counted against the shift target, including queued and presented ones.
    pub fn committed(&self) -> u32 {
        let pending = self.queue.len() as u32 + u32::from(self.current.is_some());
        self.processed_in_shift + pending
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.current.is_none()
    }

    /// Clears everything that only makes sense inside a running shift.
    pub fn reset_for_shift(&mut self) {
        self.queue.clear();
        self.current = None;
        self.processed_in_shift = 0;
        self.defer_count_shift = 0;
        self.lunch_taken = false;
        self.shift_end = ShiftEndGuard::Idle;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Streak {
    pub correct: u32,
    pub wrong: u32,
}

impl Streak {
    pub fn record(&mut self, correct: bool) {
        if correct {
            self.correct += 1;
            self.wrong = 0;
        } else {
            self.wrong += 1;
            self.correct = 0;
        }
    }

    pub fn reset(&mut self) {
        self.correct = 0;
        self.wrong = 0;
    }
}
