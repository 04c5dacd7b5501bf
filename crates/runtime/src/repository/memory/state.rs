//! In-memory StateRepository implementation for tests and local runs.

use std::sync::RwLock;

use annex_core::GameState;

use crate::repository::{RepositoryError, Result, StateRepository};

/// In-memory implementation of StateRepository.
#[derive(Default)]
pub struct InMemoryStateRepo {
    slot: RwLock<Option<GameState>>,
    saves: RwLock<u64>,
}

impl InMemoryStateRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a run already saved.
    pub fn with_state(state: GameState) -> Self {
        Self {
            slot: RwLock::new(Some(state)),
            saves: RwLock::new(0),
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> u64 {
        self.saves.read().map(|count| *count).unwrap_or(0)
    }
}

impl StateRepository for InMemoryStateRepo {
    fn save(&self, state: &GameState) -> Result<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = Some(state.clone());
        let mut saves = self
            .saves
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *saves += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<GameState>> {
        let slot = self
            .slot
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slot.clone())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = None;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.slot
            .read()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }
}
