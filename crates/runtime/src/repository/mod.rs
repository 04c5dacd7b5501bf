//! Repository layer for dynamic runtime data
//!
//! Repositories hold data that CHANGES during play: the save slot of the
//! current run. Static content (rules, logs, story tables) comes from the
//! catalog in [`crate::oracle`], not from repositories.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::FileStateRepository;
pub use memory::InMemoryStateRepo;
pub use traits::StateRepository;
pub use types::SaveFile;
