//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the state and executes intents. The scheduler
//! drives the clock, the spawn worker feeds the queue and the persistence
//! worker keeps the save slot current.

mod persistence;
mod scheduler;
mod simulation;
mod spawn;

pub use persistence::{PersistenceError, PersistenceWorker};
pub use scheduler::SchedulerWorker;
pub use simulation::{Command, SimulationWorker};
pub use spawn::SpawnWorker;
