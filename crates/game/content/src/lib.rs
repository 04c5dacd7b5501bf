//! Data-driven content tables and loaders.
//!
//! This crate houses the desk's static content and provides loaders for
//! RON/TOML data files:
//! - House rules and Mog's amendments (RON)
//! - Traps and timed events (RON)
//! - Exhibit dossiers and log pools (RON)
//! - Emails, review memos, lunch scenes, sticky notes and ending texts (RON)
//! - Desk tuning (TOML)
//!
//! Content is consumed through [`annex_core::CatalogOracle`] and never appears
//! in game state. The same tables are embedded in the binary so a run can
//! start without a data directory.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{LogTables, StaticCatalog};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, EndingLoader, ExhibitLoader, InterruptLoader, LoadResult,
    LogLoader, LunchLoader, MailLoader, NoteLoader, RuleLoader,
};
