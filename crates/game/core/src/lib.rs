//! Deterministic game logic and data types for the Mapleton Annex triage desk.
//!
//! `annex-core` defines the canonical rules (intents, engine, shift lifecycle,
//! story selection) and exposes pure APIs shared by the runtime and the
//! client. All state mutation flows through [`engine::GameEngine`]; timers
//! advance through `Tick` intents and randomness through the seeded
//! [`env::RngOracle`], so a run is a pure function of its seed and intents.
pub mod action;
pub mod config;
pub mod director;
pub mod endings;
pub mod engine;
pub mod env;
pub mod error;
pub mod rules;
pub mod scheduler;
pub mod shift;
pub mod state;
pub mod story;

#[cfg(test)]
mod testing;

pub use action::{
    ActionExtra, ActionTransition, EnqueueLogAction, Intent, LifecycleError, ModalError, Notice,
    PerformAction, PlayerAction, PlayerIntent, ProviderTelemetry, ResolveError, SystemError,
    SystemIntent,
};
pub use config::GameConfig;
pub use director::{ContentIntent, DirectorInstruction, Rail};
pub use engine::{ExecuteError, ExecutionOutcome, GameEngine, TransitionPhase, TransitionPhaseError};
pub use env::{CatalogError, CatalogOracle, GameEnv, LogPool, PcgRng, RngOracle};
pub use error::{ErrorSeverity, GameError};
pub use shift::{ProviderContext, SpawnPlan, SpawnSource};
pub use state::{
    Ending, ExhibitId, Feedback, GameState, HazardTags, LogItem, Meters, Modal, Phase, Rank,
    StoryFlags, Verdict,
};
