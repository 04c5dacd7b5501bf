//! Save slot discovery for resuming runs.

use std::path::Path;

use anyhow::{Context, Result};

use annex_core::Rank;
use runtime::SaveFile;

/// Information about a saved run.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    /// Slot name, the file stem of `{session_id}.json`.
    pub session_id: String,

    /// Milliseconds since the epoch the slot was written, when recorded.
    pub saved_at: Option<i64>,

    pub shift_index: u32,
    pub rank: Rank,
}

/// List all save slots in the save data directory, most recent first.
///
/// Files that are not readable saves are skipped.
pub fn list_sessions(base_dir: &Path) -> Result<Vec<SessionInfo>> {
    if !base_dir.exists() {
        return Ok(Vec::new());
    }

    let mut sessions = Vec::new();

    for entry in std::fs::read_dir(base_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() || path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }

        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .context("Invalid UTF-8 in save file name")?
            .to_string();

        let save: SaveFile = match std::fs::read(&path)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| serde_json::from_slice(&bytes).map_err(anyhow::Error::from))
        {
            Ok(save) => save,
            Err(err) => {
                tracing::debug!("Skipping {}: {}", path.display(), err);
                continue;
            }
        };

        sessions.push(SessionInfo {
            session_id: name,
            saved_at: save.saved_at.map(|at| at.timestamp_millis()),
            shift_index: save.state.shift_index,
            rank: save.state.rank,
        });
    }

    // Most recent first; undated saves last
    sessions.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));

    Ok(sessions)
}

/// Find the most recently written save slot.
pub fn find_latest_session(base_dir: &Path) -> Result<Option<SessionInfo>> {
    let sessions = list_sessions(base_dir)?;
    Ok(sessions.into_iter().next())
}
