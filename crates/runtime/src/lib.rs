//! Runtime orchestration for the Mapleton Annex triage desk.
//!
//! This crate wires the deterministic reducer from `annex-core` into a set of
//! tokio workers. Consumers embed [`Runtime`] to run a session and talk to it
//! through the cloneable [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`providers`] holds the content provider seam and its static fallback
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
//! - `workers` keeps the background tasks internal to the crate
pub mod api;
pub mod events;
pub mod oracle;
pub mod providers;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{
    ContentProvider, GeneratedLog, ProviderError, Result, RuntimeError, RuntimeHandle, Snapshot,
};
pub use events::{ContentEvent, Event, EventBus, GameStateEvent, PersistenceEvent, Topic};
pub use oracle::OracleBundle;
pub use providers::FallbackProvider;
pub use repository::{
    FileStateRepository, InMemoryStateRepo, RepositoryError, SaveFile, StateRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use workers::PersistenceError;
