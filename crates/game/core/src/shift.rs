//! Shift lifecycle.
//!
//! Everything that happens inside a shift without a direct player request:
//! presenting the next log, calling lunch, arming the one-shot shift-end
//! guard, planning content spawns and finalizing the shift into a review or
//! the next shift's email.
//!
//! [`settle`] runs after every successful intent. It is idempotent, so
//! repeated observations of the same condition never double-fire.

use std::collections::BTreeSet;

use crate::action::Notice;
use crate::config::GameConfig;
use crate::director::{self, DirectorInstruction};
use crate::endings;
use crate::env::{Dice, GameEnv, LogPool, RngStream};
use crate::state::{GameState, Interaction, LogItem, Phase, Rank, ShiftEndGuard, StoryFlags, WeeklyStats};
use crate::story;

/// Logs the current shift must process before it can end.
pub fn shift_target(state: &GameState, env: &GameEnv<'_>) -> u32 {
    if state.is_tutorial() {
        // Boot log plus the scripted lessons.
        1 + env.catalog().pool(LogPool::Tutorial).len() as u32
    } else {
        env.config().logs_per_shift
    }
}

pub fn lunch_threshold(target: u32) -> u32 {
    target / 2
}

fn lunch_pending(state: &GameState) -> bool {
    matches!(state.phase, Phase::ShiftActive) && !state.work.lunch_taken
}

/// Whether the shift wants another log from the content provider.
pub fn spawn_needed(state: &GameState, env: &GameEnv<'_>) -> bool {
    let work = &state.work;
    if !state.phase.is_active() || !work.shift_end.is_idle() {
        return false;
    }
    if work.queue.len() >= GameConfig::MAX_QUEUE {
        return false;
    }
    let target = shift_target(state, env);
    let committed = work.committed();
    if committed >= target {
        return false;
    }
    // Hold the second half of the shift until lunch is over.
    let threshold = lunch_threshold(target);
    !(lunch_pending(state) && committed >= threshold && work.processed_in_shift < threshold)
}

/// Presents queued logs, triggers lunch and arms the shift end.
pub fn settle(state: &mut GameState, env: &GameEnv<'_>, notices: &mut Vec<Notice>) {
    if !state.is_interactive() || !state.work.shift_end.is_idle() {
        return;
    }
    let target = shift_target(state, env);

    if state.work.current.is_none() {
        let processed = state.work.processed_in_shift;
        let lunch_due = lunch_pending(state)
            && state.work.queue.is_empty()
            && processed >= lunch_threshold(target)
            && processed < target;
        if lunch_due {
            start_lunch(state, env, notices);
            if !state.phase.is_active() {
                return;
            }
        }

        if let Some(next) = state.work.queue.pop_front() {
            present(state, env, next, notices);
        }
    }

    if state.work.is_idle() {
        if state.work.processed_in_shift >= target {
            state.work.shift_end = ShiftEndGuard::Armed {
                since_ms: state.clock_ms,
            };
            notices.push(Notice::ShiftEndArmed);
        } else if spawn_needed(state, env) {
            notices.push(Notice::SpawnDue);
        }
    }
}

fn start_lunch(state: &mut GameState, env: &GameEnv<'_>, notices: &mut Vec<Notice>) {
    state.work.lunch_taken = true;
    let mut dice = env.dice(state, RngStream::Lifecycle);
    if let Some(lunch_id) = story::select_lunch(state, env.catalog(), &mut dice) {
        notices.push(Notice::LunchStarted {
            lunch_id: lunch_id.clone(),
        });
        state.phase = Phase::LunchBreak { lunch_id };
    }
}

fn present(state: &mut GameState, env: &GameEnv<'_>, log: LogItem, notices: &mut Vec<Notice>) {
    if state.is_tutorial() {
        let last_lesson = env.catalog().pool(LogPool::Tutorial).last();
        if last_lesson.is_some_and(|lesson| lesson.id == log.id) {
            state.meters.stress = GameConfig::TUTORIAL_SPIKE_STRESS;
        }
    }
    notices.push(Notice::LogPresented { id: log.id.clone() });
    state.work.current = Some(log);
}

// ============================================================================
// Spawn planning
// ============================================================================

/// Context forwarded to the content provider alongside an instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProviderContext {
    pub influence: i32,
    pub shift_index: u32,
    /// When false the provider must answer from its static table.
    pub use_provider: bool,
    pub last_interaction: Option<Interaction>,
    pub seen_ids: BTreeSet<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnSource {
    /// A ready-made log from a content table.
    Scripted(LogItem),
    /// A log the content provider must produce.
    Generate(DirectorInstruction),
}

/// What the runtime should enqueue next, tagged with the shift it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnPlan {
    pub serial: u64,
    pub source: SpawnSource,
    pub context: ProviderContext,
}

fn unseen_pick(
    state: &GameState,
    env: &GameEnv<'_>,
    pool: LogPool,
    dice: &mut Dice<'_>,
) -> Option<LogItem> {
    let candidates: Vec<_> = env
        .catalog()
        .pool(pool)
        .iter()
        .filter(|log| !state.history.seen_log_ids.contains(&log.id))
        .collect();
    dice.pick(&candidates).map(|log| (*log).clone())
}

/// Decides the next spawn. `None` when the shift needs no more logs.
///
/// Pure with respect to state; the runtime calls it on a snapshot.
pub fn plan_spawn(state: &GameState, env: &GameEnv<'_>) -> Option<SpawnPlan> {
    if !spawn_needed(state, env) {
        return None;
    }
    let config = env.config();
    let catalog = env.catalog();
    let mut dice = env.dice(state, RngStream::Spawn);
    let shift = state.shift_index;

    let source = if state.is_tutorial() {
        let committed = state.work.committed() as usize;
        let log = match committed {
            0 => dice.pick(catalog.pool(LogPool::Boot)).cloned()?,
            step => catalog.pool(LogPool::Tutorial).get(step - 1).cloned()?,
        };
        SpawnSource::Scripted(log)
    } else {
        let flavor = (shift <= config.flavor_max_shift && dice.chance(config.flavor_chance_permille))
            .then(|| unseen_pick(state, env, LogPool::Flavor, &mut dice))
            .flatten();
        let human = || {
            (shift >= config.human_min_shift && dice.chance(config.human_chance_permille))
                .then(|| unseen_pick(state, env, LogPool::Human, &mut dice))
                .flatten()
        };
        match flavor.or_else(human) {
            Some(log) => SpawnSource::Scripted(log),
            None => {
                let mut director_dice = env.dice(state, RngStream::Director);
                SpawnSource::Generate(director::decide(state, config, &mut director_dice))
            }
        }
    };

    Some(SpawnPlan {
        serial: state.work.shift_serial,
        source,
        context: ProviderContext {
            influence: state.meters.influence,
            shift_index: shift,
            use_provider: state.use_provider,
            last_interaction: state.history.last_interaction.clone(),
            seen_ids: state.history.seen_log_ids.clone(),
        },
    })
}

// ============================================================================
// Finalization
// ============================================================================

/// Weekly rollup of the shift that just ended.
pub fn rollup(state: &GameState, env: &GameEnv<'_>) -> WeeklyStats {
    let target = shift_target(state, env).max(1);
    let processed = state.work.processed_in_shift;
    let evidence = state.narrative.evidence_count as i32;
    WeeklyStats {
        throughput: ((processed * 100 + target / 2) / target).min(100) as i32,
        auditability: state.meters.daily_safety,
        variance: 10 + 2 * state.work.defer_count_global as i32,
        scrutiny: (20 + 10 * evidence).min(100),
        stability: 100 - state.meters.stress,
        dossier_count: evidence,
        rapport: state.narrative.mog_rapport,
    }
}

/// Closes the shift: computes the rollup and opens a review or moves on.
pub fn finalize(state: &mut GameState, env: &GameEnv<'_>, notices: &mut Vec<Notice>) {
    state.weekly = rollup(state, env);
    state.work.queue.clear();
    state.work.current = None;
    state.modal = None;
    state.paused = false;
    notices.push(Notice::ShiftFinalized {
        shift_index: state.shift_index,
    });

    let memo = story::select_review(state).filter(|id| env.catalog().memo(id).is_ok());
    match memo {
        Some(memo_id) => {
            notices.push(Notice::ReviewOpened {
                memo_id: memo_id.to_owned(),
            });
            state.phase = Phase::Reviewing {
                memo_id: memo_id.to_owned(),
            };
        }
        None => advance_shift(state, env, notices),
    }
}

/// Carries daily safety into the career meter and opens the next shift.
///
/// On the final shift this concludes the run instead.
pub fn advance_shift(state: &mut GameState, env: &GameEnv<'_>, notices: &mut Vec<Notice>) {
    if state.shift_index >= env.config().final_shift() {
        let ending = endings::final_ending(state);
        endings::conclude(state, ending, notices);
        return;
    }

    // Half the distance from 70, rounded half up.
    state.meters.safety += (state.meters.daily_safety - 70 + 1).div_euclid(2);
    state.meters.clamp();

    let finished = state.shift_index;
    if state.rank == Rank::Visitor && finished >= 2 && state.meters.safety > 60 {
        state.rank = Rank::Observer;
        notices.push(Notice::RankChanged { rank: Rank::Observer });
    }
    if !state.narrative.is_ollie_mode()
        && state.meters.influence > 80
        && finished > 7
        && state.work.defer_count_global > 10
    {
        state.narrative.flags |= StoryFlags::OLLIE_MODE;
        notices.push(Notice::OllieModeEnabled);
    }

    state.shift_index += 1;
    open_email_or_standby(state, env, notices);
}

/// Opens the email for the current shift, or waits for clock-in.
pub fn open_email_or_standby(state: &mut GameState, env: &GameEnv<'_>, notices: &mut Vec<Notice>) {
    match story::select_email(state, env.catalog()) {
        Some(email_id) => {
            notices.push(Notice::EmailOpened {
                email_id: email_id.clone(),
            });
            state.phase = Phase::EmailModal { email_id };
        }
        None => state.phase = Phase::Standby,
    }
}
