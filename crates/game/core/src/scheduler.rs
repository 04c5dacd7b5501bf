//! Game-clock driven behaviour.
//!
//! The runtime advances the clock with `Tick` intents. Every timer lives in
//! state as an absolute deadline, so replaying the same ticks replays the
//! same run and nothing fires twice.

use crate::action::{Notice, SystemError};
use crate::env::{GameEnv, RngStream};
use crate::shift;
use crate::state::{ActiveEvent, GameState, Modal, Phase, ShiftEndGuard};

/// Advances the clock by `elapsed_ms` and fires every timer that came due.
pub fn tick(
    state: &mut GameState,
    env: &GameEnv<'_>,
    elapsed_ms: u64,
    notices: &mut Vec<Notice>,
) -> Result<(), SystemError> {
    state.clock_ms = state.clock_ms.saturating_add(elapsed_ms);

    advance_shift_end(state, env, notices);
    if !state.is_interactive() {
        return Ok(());
    }

    if state.clock_ms >= state.work.next_poll_at_ms {
        state.work.next_poll_at_ms = state.clock_ms + env.config().poll_interval_ms;
        drift_stress(state, env);
        roll_amendment(state, env, notices);
        roll_event(state, env, notices);
    }
    rot_rules(state, env, notices);

    if matches!(state.phase, Phase::ShiftActive) && state.clock_ms >= state.work.next_spawn_at_ms {
        state.work.next_spawn_at_ms = state.clock_ms + env.config().spawn_interval_ms;
        if shift::spawn_needed(state, env) {
            notices.push(Notice::SpawnDue);
        }
    }
    Ok(())
}

/// Walks the one-shot guard: armed, then ending overlay, then finalized.
fn advance_shift_end(state: &mut GameState, env: &GameEnv<'_>, notices: &mut Vec<Notice>) {
    let config = env.config();
    match state.work.shift_end {
        ShiftEndGuard::Armed { since_ms }
            if state.clock_ms >= since_ms + config.shift_end_grace_ms =>
        {
            state.work.shift_end = ShiftEndGuard::Ending {
                since_ms: state.clock_ms,
            };
            state.phase = Phase::ShiftEnding;
            state.paused = false;
            state.modal = None;
            notices.push(Notice::ShiftEnding);
        }
        ShiftEndGuard::Ending { since_ms }
            if state.clock_ms >= since_ms + config.shift_finalize_delay_ms =>
        {
            state.work.shift_end = ShiftEndGuard::Finalized;
            shift::finalize(state, env, notices);
        }
        _ => {}
    }
}

fn drift_stress(state: &mut GameState, env: &GameEnv<'_>) {
    let config = env.config();
    if state.work.queue.len() > config.stress_backlog_threshold {
        state.meters.stress += 1 + state.meters.influence / 50;
    } else if state.work.current.is_some() {
        let mut dice = env.dice(state, RngStream::Scheduler);
        if dice.chance(config.stress_drift_chance_permille) {
            state.meters.stress += 1;
        }
    } else if state.work.is_idle() {
        state.meters.stress -= 1;
    }
}

fn roll_amendment(state: &mut GameState, env: &GameEnv<'_>, notices: &mut Vec<Notice>) {
    let config = env.config();
    let cooled_down = state
        .total_logs_processed
        .saturating_sub(state.rules.logs_at_last_amendment)
        >= config.amendment_log_cooldown;
    if !state.work.shift_end.is_idle()
        || state.shift_index < config.amendment_min_shift
        || state.meters.influence <= config.amendment_min_influence
        || !cooled_down
    {
        return;
    }

    let mut dice = env.dice(state, RngStream::Scheduler);
    // Burn one draw so the drift roll and this one never share a value.
    dice.next_u32();
    if !dice.chance(config.amendment_chance_permille) {
        return;
    }
    let candidates: Vec<_> = env
        .catalog()
        .amendments()
        .iter()
        .filter(|amendment| {
            !state.rules.is_amendment_active(&amendment.id)
                && !state.rules.is_amended(&amendment.rule_id)
        })
        .collect();
    if let Some(amendment) = dice.pick(&candidates) {
        notices.push(Notice::AmendmentProposed {
            amendment_id: amendment.id.clone(),
        });
        state.modal = Some(Modal::Amendment {
            amendment_id: amendment.id.clone(),
        });
    }
}

fn roll_event(state: &mut GameState, env: &GameEnv<'_>, notices: &mut Vec<Notice>) {
    let config = env.config();
    if state.modal.is_some() || state.modifiers.event.is_some() || state.is_tutorial() {
        return;
    }
    let cooled_down = state
        .modifiers
        .last_event_at_ms
        .is_none_or(|at| state.clock_ms >= at + config.event_cooldown_ms);
    if !cooled_down {
        return;
    }

    let mut dice = env.dice(state, RngStream::Scheduler);
    dice.next_u32();
    dice.next_u32();
    if !dice.chance(config.event_chance_permille) {
        return;
    }
    if let Some(event) = dice.pick(env.catalog().events()) {
        state.modifiers.event = Some(ActiveEvent {
            id: event.id.clone(),
            kind: event.kind,
            remaining: event.duration,
        });
        state.modifiers.last_event_at_ms = Some(state.clock_ms);
        notices.push(Notice::EventStarted {
            event_id: event.id.clone(),
        });
    }
}

/// Late shifts slowly decay the rulebook. Rotted rules are cosmetic.
fn rot_rules(state: &mut GameState, env: &GameEnv<'_>, notices: &mut Vec<Notice>) {
    let config = env.config();
    if state.shift_index <= config.rule_rot_after_shift || state.clock_ms < state.rules.next_rot_at_ms {
        return;
    }
    state.rules.next_rot_at_ms = state.clock_ms + config.rule_rot_interval_ms;

    let fresh: Vec<String> = state
        .rules
        .active
        .iter()
        .filter(|rule| !state.rules.rotted.contains(rule))
        .cloned()
        .collect();
    let mut dice = env.dice(state, RngStream::Scheduler);
    dice.next_u32();
    dice.next_u32();
    dice.next_u32();
    if let Some(rule_id) = dice.pick(&fresh) {
        notices.push(Notice::RuleRotted {
            rule_id: rule_id.clone(),
        });
        state.rules.rotted.push(rule_id.clone());
    }
}
