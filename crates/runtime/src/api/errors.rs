//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, repositories, and content
//! providers so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use annex_core::{ExecuteError, GameError};

pub use crate::providers::ProviderError;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,

    /// The reducer refused the intent. The state is unchanged.
    #[error("{intent} rejected: {error}")]
    Rejected {
        intent: &'static str,
        #[source]
        error: ExecuteError,
    },
}

impl RuntimeError {
    /// True when the intent was refused by the game rules rather than by
    /// broken plumbing. Presentation layers ignore these.
    pub fn is_rejection(&self) -> bool {
        matches!(self, RuntimeError::Rejected { .. })
    }

    /// Stable code of the underlying game error, if any.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            RuntimeError::Rejected { error, .. } => Some(error.error_code()),
            _ => None,
        }
    }
}
