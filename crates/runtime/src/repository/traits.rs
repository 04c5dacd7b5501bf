//! Repository contracts for saving and loading the current run.

use annex_core::GameState;

use super::Result;

/// Save slot for one session.
///
/// Implementations store whatever they are given; deciding *when* a state is
/// safe to persist is the persistence worker's job.
pub trait StateRepository: Send + Sync {
    /// Replace the saved run.
    fn save(&self, state: &GameState) -> Result<()>;

    /// Load the saved run, if any.
    ///
    /// Fields missing from an older save take their fresh-run values. The
    /// caller still normalizes transient fields with
    /// [`GameState::resumed`].
    fn load(&self) -> Result<Option<GameState>>;

    /// Remove the saved run. Clearing an empty slot is not an error.
    fn clear(&self) -> Result<()>;

    /// Check if a save exists
    fn exists(&self) -> bool {
        matches!(self.load(), Ok(Some(_)))
    }
}
