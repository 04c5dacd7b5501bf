//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the simulation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use annex_core::GameState;

use crate::api::{ContentProvider, Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::oracle::OracleBundle;
use crate::providers::FallbackProvider;
use crate::repository::StateRepository;
use crate::workers::{
    Command, PersistenceWorker, SchedulerWorker, SimulationWorker, SpawnWorker,
};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Wall-clock period of the scheduler's ticks.
    pub tick_interval: Duration,
    /// Game milliseconds per wall-clock millisecond.
    pub tick_scale: u32,
    /// Drive the clock from wall time. Tests disable it and tick by hand.
    pub enable_scheduler: bool,
    /// How often dirty state is flushed to the repository.
    pub persistence_interval: Duration,
    /// Budget for one external provider call before the fallback answers.
    pub provider_timeout: Duration,
    /// Seed for a fresh run. Random when unset.
    pub seed: Option<u64>,
    /// Whether a fresh run may call the external provider.
    pub use_provider: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            command_buffer_size: 32,
            tick_interval: Duration::from_millis(250),
            tick_scale: 1,
            enable_scheduler: true,
            persistence_interval: Duration::from_secs(5),
            provider_timeout: Duration::from_secs(20),
            seed: None,
            use_provider: false,
        }
    }
}

/// Main runtime that orchestrates game simulation
///
/// Design: Runtime owns workers and coordinates execution.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    // Shared handle (can be cloned for clients)
    handle: RuntimeHandle,

    // Background workers
    sim_worker_handle: JoinHandle<()>,
    spawn_worker_handle: JoinHandle<()>,
    scheduler_handle: Option<JoinHandle<()>>,
    persistence_handle: Option<JoinHandle<()>>,

    // Auxiliary workers stop first so they can still reach the simulation.
    aux_shutdown: watch::Sender<bool>,
    sim_shutdown: watch::Sender<bool>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The scheduler, spawn and persistence workers stop first; persistence
    /// writes its final checkpoint while the simulation is still up. Handles
    /// held by clients fail with [`RuntimeError::CommandChannelClosed`]
    /// afterwards.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.aux_shutdown.send(true);

        if let Some(scheduler) = self.scheduler_handle {
            scheduler.await.map_err(RuntimeError::WorkerJoin)?;
        }
        self.spawn_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        if let Some(persistence) = self.persistence_handle {
            persistence.await.map_err(RuntimeError::WorkerJoin)?;
        }

        let _ = self.sim_shutdown.send(true);
        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        info!("Runtime shut down");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    oracles: Option<OracleBundle>,
    provider: Option<Arc<dyn ContentProvider>>,
    repository: Option<Arc<dyn StateRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            oracles: None,
            provider: None,
            repository: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide initial game state. Takes precedence over a saved run.
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set required oracle bundle
    pub fn oracles(mut self, oracles: OracleBundle) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Set the external content provider (optional).
    ///
    /// Without one every generated log comes from the static fallback.
    pub fn provider(mut self, provider: impl ContentProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Set the save slot (optional). Enables loading and the persistence
    /// worker.
    pub fn repository(mut self, repository: Arc<dyn StateRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;
        let config = self.config;

        let initial_state = match self.state {
            Some(state) => state,
            None => Self::load_or_fresh(&config, &oracles, self.repository.as_deref()),
        };

        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let (command_tx, command_rx) = mpsc::channel::<Command>(config.command_buffer_size);
        // One pending wake-up is enough; the spawn worker re-plans each time.
        let (spawn_tx, spawn_rx) = mpsc::channel::<()>(1);
        let (aux_shutdown, aux_shutdown_rx) = watch::channel(false);
        let (sim_shutdown, sim_shutdown_rx) = watch::channel(false);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());
        let fallback = FallbackProvider::new(oracles.catalog().clone(), initial_state.seed);

        // Create simulation worker
        let sim_worker = SimulationWorker::new(
            initial_state,
            oracles,
            command_rx,
            event_bus,
            spawn_tx,
            sim_shutdown_rx,
        );
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        let spawn_worker = SpawnWorker::new(
            handle.clone(),
            self.provider,
            fallback,
            config.provider_timeout,
            spawn_rx,
            aux_shutdown_rx.clone(),
        );
        let spawn_worker_handle = tokio::spawn(async move {
            spawn_worker.run().await;
        });

        let scheduler_handle = if config.enable_scheduler {
            let scheduler = SchedulerWorker::new(
                handle.clone(),
                config.tick_interval,
                config.tick_scale,
                aux_shutdown_rx.clone(),
            );
            Some(tokio::spawn(async move {
                scheduler.run().await;
            }))
        } else {
            None
        };

        let persistence_handle = self.repository.map(|repository| {
            let worker = PersistenceWorker::new(
                handle.clone(),
                repository,
                config.persistence_interval,
                aux_shutdown_rx,
            );
            tokio::spawn(async move {
                worker.run().await;
            })
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
            spawn_worker_handle,
            scheduler_handle,
            persistence_handle,
            aux_shutdown,
            sim_shutdown,
        })
    }

    /// Resumes the saved run, or starts a fresh one when there is none or it
    /// cannot be read.
    fn load_or_fresh(
        config: &RuntimeConfig,
        oracles: &OracleBundle,
        repository: Option<&dyn StateRepository>,
    ) -> GameState {
        let default_rules = oracles.default_rule_ids();

        if let Some(repository) = repository {
            match repository.load() {
                Ok(Some(state)) => {
                    info!(
                        run_id = %state.run_id,
                        shift = state.shift_index,
                        "Resuming saved run"
                    );
                    return state.resumed(&default_rules);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(error = %err, "Saved run unreadable, starting fresh");
                }
            }
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut state = GameState::new(seed, oracles.config(), default_rules);
        state.use_provider = config.use_provider;
        info!(run_id = %state.run_id, "Starting fresh run");
        state
    }
}
