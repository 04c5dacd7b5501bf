//! Persistence worker for the save slot.
//!
//! Follows the GameState topic and writes the run to the repository at safe
//! checkpoints.
//!
//! # Checkpoint Strategy
//!
//! - A state is written only when [`GameState::is_safe_checkpoint`] holds,
//!   so mid-shift states never reach disk
//! - Player intents and shift finalization checkpoint immediately
//! - Everything else (ticks, spawns) marks the slot dirty; the interval
//!   flushes it
//! - A reset clears the slot
//! - Shutdown writes one last checkpoint

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use annex_core::{GameState, Intent, Notice};

use crate::api::RuntimeHandle;
use crate::events::{Event, EventBus, GameStateEvent, PersistenceEvent};
use crate::repository::StateRepository;

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Errors that can occur during persistence operations
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to query state from SimulationWorker")]
    StateQuery,

    #[error(transparent)]
    Repository(#[from] crate::repository::RepositoryError),
}

pub struct PersistenceWorker {
    handle: RuntimeHandle,
    repository: Arc<dyn StateRepository>,
    event_bus: EventBus,
    event_rx: broadcast::Receiver<Event>,
    flush_interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
    /// Nonce of the last state written, to skip identical saves.
    last_saved: Option<u64>,
    dirty: bool,
}

impl PersistenceWorker {
    pub fn new(
        handle: RuntimeHandle,
        repository: Arc<dyn StateRepository>,
        flush_interval: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let event_bus = handle.event_bus().clone();
        let event_rx = handle.subscribe(crate::events::Topic::GameState);
        Self {
            handle,
            repository,
            event_bus,
            event_rx,
            flush_interval,
            shutdown_rx,
            last_saved: None,
            dirty: false,
        }
    }

    pub async fn run(mut self) {
        let mut flush = interval(self.flush_interval);
        flush.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                event = self.event_rx.recv() => {
                    match event {
                        Ok(Event::GameState(event)) => self.handle_event(event).await,
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(target: "runtime::persistence", skipped, "Persistence lagged behind events");
                            self.dirty = true;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
                _ = flush.tick() => {
                    if self.dirty {
                        let result = self.checkpoint().await;
                        self.report(result);
                    }
                }
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        // Final checkpoint before the simulation worker goes away.
        let result = self.checkpoint().await;
        self.report(result);
        debug!(target: "runtime::persistence", "PersistenceWorker stopped");
    }

    async fn handle_event(&mut self, event: GameStateEvent) {
        let GameStateEvent::IntentApplied {
            intent, notices, ..
        } = event
        else {
            return;
        };

        if intent.is_reset() {
            self.clear();
            return;
        }

        let urgent = matches!(intent, Intent::Player(_))
            || notices.iter().any(|notice| {
                matches!(
                    notice,
                    Notice::ShiftFinalized { .. } | Notice::GameOver { .. }
                )
            });

        self.dirty = true;
        if urgent {
            let result = self.checkpoint().await;
            self.report(result);
        }
    }

    /// Writes the current state if it is safe and new. Returns the saved
    /// state, if any.
    async fn checkpoint(&mut self) -> Result<Option<GameState>> {
        let state = self
            .handle
            .query_state()
            .await
            .map_err(|_| PersistenceError::StateQuery)?;

        if !state.is_safe_checkpoint() {
            // Stay dirty; the shift will end and be saved then.
            return Ok(None);
        }
        self.dirty = false;
        if self.last_saved == Some(state.nonce) {
            return Ok(None);
        }

        self.repository.save(&state)?;
        self.last_saved = Some(state.nonce);
        Ok(Some(state))
    }

    fn clear(&mut self) {
        self.dirty = false;
        self.last_saved = None;
        match self.repository.clear() {
            Ok(()) => {
                info!(target: "runtime::persistence", "Save cleared");
                self.event_bus
                    .publish(Event::Persistence(PersistenceEvent::Cleared));
            }
            Err(err) => self.report(Err(err.into())),
        }
    }

    fn report(&self, result: Result<Option<GameState>>) {
        match result {
            Ok(Some(state)) => {
                debug!(
                    target: "runtime::persistence",
                    nonce = state.nonce,
                    shift = state.shift_index,
                    "Checkpoint saved"
                );
                self.event_bus
                    .publish(Event::Persistence(PersistenceEvent::Saved {
                        nonce: state.nonce,
                        shift_index: state.shift_index,
                    }));
            }
            Ok(None) => {}
            Err(PersistenceError::StateQuery) => {
                debug!(target: "runtime::persistence", "Simulation worker unavailable, checkpoint skipped");
            }
            Err(err) => {
                error!(target: "runtime::persistence", error = %err, "Checkpoint failed");
                self.event_bus
                    .publish(Event::Persistence(PersistenceEvent::Failed {
                        error: err.to_string(),
                    }));
            }
        }
    }
}
