//! Asynchronous abstraction for sourcing generated logs.
//!
//! The director decides *what* the next log should be; a [`ContentProvider`]
//! writes it. Implementations may call out to a text model, replay fixtures
//! or answer from the static tables (see [`crate::FallbackProvider`]).
use async_trait::async_trait;

use annex_core::{DirectorInstruction, LogItem, ProviderContext};

pub use crate::providers::ProviderError;

/// A log written for one director instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedLog {
    pub log: LogItem,
    pub tokens_used: u64,
    /// The provider answered, but with degraded content.
    pub is_error: bool,
}

impl GeneratedLog {
    pub fn new(log: LogItem) -> Self {
        Self {
            log,
            tokens_used: 0,
            is_error: false,
        }
    }
}

/// Trait for producing a log that honours a director instruction.
///
/// Implementations must respect `instruction.intent`: hazard intents need
/// rule-matching tags, `Safe` needs none. Generated logs should carry a
/// content-derived id (see [`LogItem::generated`]) so the same text is never
/// shown twice across sessions.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn generate(
        &self,
        instruction: &DirectorInstruction,
        context: &ProviderContext,
    ) -> Result<GeneratedLog, ProviderError>;

    /// Name used in log lines and content events.
    fn name(&self) -> &'static str;
}
