//! Content providers that turn director instructions into logs.

mod fallback;

pub use fallback::FallbackProvider;

use annex_core::{ContentIntent, ExhibitId};
use thiserror::Error;

/// Failures surfaced by a [`crate::ContentProvider`].
///
/// None of these reach the player: the spawn worker answers from the static
/// table instead.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider timed out after {0} ms")]
    Timeout(u64),

    #[error("provider returned malformed content: {0}")]
    Malformed(String),

    #[error("no {intent} content for {target}")]
    NoContent {
        target: ExhibitId,
        intent: ContentIntent,
    },
}
