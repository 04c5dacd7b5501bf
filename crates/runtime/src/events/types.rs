//! Event types for different topics.

use annex_core::{ExhibitId, Feedback, Intent, Notice, TransitionPhase};
use serde::{Deserialize, Serialize};

/// Events related to game state changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameStateEvent {
    /// An intent was applied and committed.
    IntentApplied {
        nonce: u64,
        intent: Intent,
        feedback: Option<Feedback>,
        notices: Vec<Notice>,
        /// Game clock after the intent.
        clock_ms: u64,
    },

    /// The reducer refused an intent; the state is unchanged.
    IntentRejected {
        intent: Intent,
        phase: Option<TransitionPhase>,
        code: String,
        error: String,
    },
}

/// Events related to log spawning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ContentEvent {
    /// A log was delivered to the queue.
    LogSpawned {
        id: String,
        exhibit: ExhibitId,
        /// `"script"` for table logs, otherwise the provider name.
        source: String,
        tokens_used: u64,
        /// The provider failed and the static table answered instead.
        fallback: bool,
    },

    /// A spawn was abandoned, typically because the shift moved on.
    SpawnDropped { reason: String },
}

/// Events related to the save slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PersistenceEvent {
    Saved { nonce: u64, shift_index: u32 },
    Cleared,
    Failed { error: String },
}
