//! Runtime-issued intents: game-clock ticks and generated-log delivery.

use crate::config::GameConfig;
use crate::env::GameEnv;
use crate::scheduler;
use crate::shift;
use crate::state::{GameState, LogItem, Phase};

use super::{ActionTransition, Notice, SystemError};

/// Advances the game clock. All timed behaviour hangs off this intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickAction {
    pub elapsed_ms: u64,
}

impl ActionTransition for TickAction {
    type Error = SystemError;
    type Result = ();

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error> {
        scheduler::tick(state, env, self.elapsed_ms, notices)
    }
}

/// Provider bookkeeping that travels with a generated log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProviderTelemetry {
    pub provider_call: bool,
    pub tokens_used: u64,
    pub is_error: bool,
}

/// Delivers a log produced for the shift identified by `serial`.
///
/// Content fetches run outside the state owner, so a result may arrive
/// after the shift it was requested for has ended. Such results are
/// rejected and the runtime drops them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnqueueLogAction {
    pub serial: u64,
    pub log: LogItem,
    #[cfg_attr(feature = "serde", serde(default))]
    pub telemetry: ProviderTelemetry,
}

impl EnqueueLogAction {
    pub fn new(serial: u64, log: LogItem) -> Self {
        Self {
            serial,
            log,
            telemetry: ProviderTelemetry::default(),
        }
    }

    #[must_use]
    pub fn with_telemetry(mut self, telemetry: ProviderTelemetry) -> Self {
        self.telemetry = telemetry;
        self
    }
}

impl ActionTransition for EnqueueLogAction {
    type Error = SystemError;
    type Result = ();

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        if self.serial != state.work.shift_serial {
            return Err(SystemError::StaleSpawn {
                got: self.serial,
                current: state.work.shift_serial,
            });
        }
        let compatible = state.phase.is_active() || matches!(state.phase, Phase::LunchBreak { .. });
        if !compatible || !state.work.shift_end.is_idle() {
            return Err(SystemError::IncompatiblePhase(state.phase.as_str()));
        }
        if state.work.queue.len() >= GameConfig::MAX_QUEUE {
            return Err(SystemError::QueueFull);
        }
        if state.work.committed() >= shift::shift_target(state, env) {
            return Err(SystemError::QuotaMet);
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error> {
        let stats = &mut state.stats;
        if self.telemetry.provider_call {
            stats.provider_calls += 1;
        }
        if self.telemetry.is_error {
            stats.errors += 1;
        }
        stats.tokens_used += self.telemetry.tokens_used;

        state.history.seen_log_ids.insert(self.log.id.clone());
        state.work.queue.push_back(self.log.clone());
        notices.push(Notice::LogEnqueued {
            id: self.log.id.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, active_state, safe_log};

    #[test]
    fn stale_spawn_is_rejected() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let mut state = active_state(&fixture);
        state.work.shift_serial = 4;
        let action = EnqueueLogAction::new(3, safe_log("late"));
        assert_eq!(
            action.pre_validate(&state, &env),
            Err(SystemError::StaleSpawn { got: 3, current: 4 })
        );
    }

    #[test]
    fn spawn_after_the_shift_ended_is_rejected() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let mut state = active_state(&fixture);
        state.phase = Phase::ShiftEnding;
        let action = EnqueueLogAction::new(state.work.shift_serial, safe_log("late"));
        assert_eq!(
            action.pre_validate(&state, &env),
            Err(SystemError::IncompatiblePhase("shift_ending"))
        );
    }

    #[test]
    fn quota_caps_enqueued_logs() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let mut state = active_state(&fixture);
        state.work.processed_in_shift = 7;
        state.work.current = Some(safe_log("c"));
        let action = EnqueueLogAction::new(state.work.shift_serial, safe_log("extra"));
        assert_eq!(action.pre_validate(&state, &env), Err(SystemError::QuotaMet));
    }

    #[test]
    fn enqueue_records_telemetry_and_seen_ids() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let mut state = active_state(&fixture);
        let action = EnqueueLogAction::new(state.work.shift_serial, safe_log("fresh"))
            .with_telemetry(ProviderTelemetry {
                provider_call: true,
                tokens_used: 120,
                is_error: true,
            });
        let mut notices = Vec::new();
        action.pre_validate(&state, &env).expect("pre_validate");
        action.apply(&mut state, &env, &mut notices).expect("apply");

        assert_eq!(state.work.queue.len(), 1);
        assert!(state.history.seen_log_ids.contains("fresh"));
        assert_eq!(state.stats.provider_calls, 1);
        assert_eq!(state.stats.errors, 1);
        assert_eq!(state.stats.tokens_used, 120);
        assert_eq!(
            notices,
            vec![Notice::LogEnqueued {
                id: "fresh".into()
            }]
        );
    }
}
