//! On-disk envelope around a saved run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use annex_core::GameState;

/// Versioned save blob.
///
/// Versioning is loose: every field defaults, so a blob written by an older
/// build (or a hand-edited one missing whole sections) still loads.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveFile {
    pub version: u32,
    pub saved_at: Option<DateTime<Utc>>,
    pub state: GameState,
}

impl SaveFile {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(state: GameState) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            saved_at: Some(Utc::now()),
            state,
        }
    }
}
