//! File-based StateRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use annex_core::GameState;

use crate::repository::{RepositoryError, Result, SaveFile, StateRepository};

/// File-based implementation of StateRepository.
///
/// Stores the run as pretty JSON in `{base_dir}/{session_id}.json`. Writes go
/// to a temp file first and are renamed into place, so a crash mid-write
/// leaves the previous save intact.
pub struct FileStateRepository {
    base_dir: PathBuf,
    session_id: String,
}

impl FileStateRepository {
    /// Create a new file-based state repository.
    pub fn new(base_dir: impl AsRef<Path>, session_id: impl Into<String>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self {
            base_dir,
            session_id: session_id.into(),
        })
    }

    /// Platform data directory for saves.
    ///
    /// - Linux: `~/.local/share/mapleton-annex/saves`
    /// - macOS: `~/Library/Application Support/mapleton-annex/saves`
    /// - Windows: `%APPDATA%\mapleton-annex\saves`
    pub fn default_dir() -> Result<PathBuf> {
        directories::ProjectDirs::from("", "", "mapleton-annex")
            .map(|dirs| dirs.data_dir().join("saves"))
            .ok_or(RepositoryError::NoDataDir)
    }

    /// Get the path to the save file.
    pub fn save_path(&self) -> PathBuf {
        self.base_dir.join(format!("{}.json", self.session_id))
    }
}

impl StateRepository for FileStateRepository {
    fn save(&self, state: &GameState) -> Result<()> {
        let path = self.save_path();
        let temp_path = path.with_extension("json.tmp");

        let json = serde_json::to_vec_pretty(&SaveFile::new(state.clone()))
            .map_err(|e| RepositoryError::Json(e.to_string()))?;

        // Write to temp file
        fs::write(&temp_path, json).map_err(RepositoryError::Io)?;

        // Atomic rename
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved state[{}] to {}", state.nonce, path.display());

        Ok(())
    }

    fn load(&self) -> Result<Option<GameState>> {
        let path = self.save_path();

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let save: SaveFile =
            serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Json(e.to_string()))?;

        tracing::debug!(
            "Loaded state[{}] (save v{}) from {}",
            save.state.nonce,
            save.version,
            path.display()
        );

        Ok(Some(save.state))
    }

    fn clear(&self) -> Result<()> {
        let path = self.save_path();

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted save {}", path.display());
        }

        Ok(())
    }

    fn exists(&self) -> bool {
        self.save_path().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annex_core::{GameConfig, Phase, Rank};

    fn state() -> GameState {
        let mut state = GameState::new(9, &GameConfig::default(), vec!["R1".into(), "R2".into()]);
        state.has_seen_intro = true;
        state.shift_index = 4;
        state.rank = Rank::Liaison;
        state.phase = Phase::Standby;
        state.narrative.evidence_count = 2;
        state
    }

    #[test]
    fn save_then_load_restores_the_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = FileStateRepository::new(dir.path(), "slot").expect("repo");
        assert!(!repo.exists());
        assert_eq!(repo.load().expect("empty load"), None);

        let saved = state();
        repo.save(&saved).expect("save");
        assert!(repo.exists());
        assert!(!repo.save_path().with_extension("json.tmp").exists());
        assert_eq!(repo.load().expect("load"), Some(saved));
    }

    #[test]
    fn clear_removes_the_save_and_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = FileStateRepository::new(dir.path(), "slot").expect("repo");
        repo.save(&state()).expect("save");

        repo.clear().expect("clear");
        repo.clear().expect("second clear");
        assert!(!repo.exists());
    }

    #[test]
    fn garbage_is_reported_not_panicked_on() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = FileStateRepository::new(dir.path(), "slot").expect("repo");
        fs::write(repo.save_path(), b"not json").expect("write");
        assert!(matches!(repo.load(), Err(RepositoryError::Json(_))));
    }
}
