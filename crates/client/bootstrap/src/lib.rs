//! Shared bootstrap utilities for client front-ends.
//!
//! Provides configuration loading, oracle assembly, save slot discovery and
//! runtime setup that can be reused by the terminal client or any other
//! front-end crate.
pub mod builder;
pub mod config;
pub mod oracles;
pub mod session;

pub use builder::{RuntimeBuilder, RuntimeSetup};
pub use config::CliConfig;
pub use oracles::{BundledOracleFactory, ContentOracleFactory, OracleFactory};
pub use session::{SessionInfo, find_latest_session, list_sessions};
