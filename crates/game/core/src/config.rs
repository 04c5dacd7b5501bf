/// Game configuration constants and tunable parameters.
///
/// Probabilities are expressed in per-mille (0..=1000) so the reducer never
/// touches floating point. Durations are in game-clock milliseconds, which the
/// runtime advances through `Tick` intents.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Global safety at the start of a new run.
    pub initial_safety: i32,
    /// Logs a regular shift must process before it ends.
    pub logs_per_shift: u32,
    /// Number of shifts in the schedule; the last index triggers a final ending.
    pub schedule_len: u32,

    pub spawn_interval_ms: u64,
    /// Cadence of stress drift and the amendment/event rolls.
    pub poll_interval_ms: u64,
    pub rule_rot_interval_ms: u64,
    /// Rules start rotting once the shift index is strictly above this value.
    pub rule_rot_after_shift: u32,
    pub event_cooldown_ms: u64,
    /// Delay between the shift-end condition and the ending overlay.
    pub shift_end_grace_ms: u64,
    /// Delay between the ending overlay and finalization.
    pub shift_finalize_delay_ms: u64,

    pub amendment_chance_permille: u32,
    pub amendment_min_shift: u32,
    pub amendment_min_influence: i32,
    /// Processed logs required between two amendment proposals.
    pub amendment_log_cooldown: u32,
    pub event_chance_permille: u32,
    pub ghost_chance_permille: u32,
    pub ghost_min_shift: u32,
    pub flavor_chance_permille: u32,
    pub flavor_max_shift: u32,
    pub human_chance_permille: u32,
    pub human_min_shift: u32,
    pub rail_chance_permille: u32,
    pub horror_chance_permille: u32,
    pub directive_note_chance_permille: u32,
    /// A trap is offered each time the global defer count hits a multiple of this.
    pub trap_every_defers: u32,
    /// Queue length above which stress climbs every poll.
    pub stress_backlog_threshold: usize,
    /// Chance of a one-point stress creep while a log sits unanswered.
    pub stress_drift_chance_permille: u32,
}

impl GameConfig {
    // ===== compile-time constants =====
    pub const MAX_QUEUE: usize = 10;
    pub const METER_MIN: i32 = 0;
    pub const METER_MAX: i32 = 100;
    pub const SNIPPET_CHARS: usize = 20;
    pub const TUTORIAL_SPIKE_STRESS: i32 = 95;
    pub const MAX_NOISE: u8 = 95;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_INITIAL_SAFETY: i32 = 80;
    pub const DEFAULT_LOGS_PER_SHIFT: u32 = 8;
    pub const DEFAULT_SCHEDULE_LEN: u32 = 11;

    pub fn new() -> Self {
        Self {
            initial_safety: Self::DEFAULT_INITIAL_SAFETY,
            logs_per_shift: Self::DEFAULT_LOGS_PER_SHIFT,
            schedule_len: Self::DEFAULT_SCHEDULE_LEN,
            spawn_interval_ms: 8_000,
            poll_interval_ms: 2_000,
            rule_rot_interval_ms: 20_000,
            rule_rot_after_shift: 7,
            event_cooldown_ms: 60_000,
            shift_end_grace_ms: 2_500,
            shift_finalize_delay_ms: 4_000,
            amendment_chance_permille: 50,
            amendment_min_shift: 4,
            amendment_min_influence: 30,
            amendment_log_cooldown: 3,
            event_chance_permille: 20,
            ghost_chance_permille: 150,
            ghost_min_shift: 6,
            flavor_chance_permille: 200,
            flavor_max_shift: 3,
            human_chance_permille: 150,
            human_min_shift: 6,
            rail_chance_permille: 300,
            horror_chance_permille: 250,
            directive_note_chance_permille: 300,
            trap_every_defers: 3,
            stress_backlog_threshold: 3,
            stress_drift_chance_permille: 300,
        }
    }

    /// Index of the last scheduled shift.
    pub fn final_shift(&self) -> u32 {
        self.schedule_len.saturating_sub(1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
