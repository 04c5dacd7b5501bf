//! Read-only inputs shared by every worker.
//!
//! The catalog and tuning are immutable for the lifetime of a runtime; the
//! dynamic run lives in [`annex_core::GameState`] inside the simulation
//! worker.
use std::sync::Arc;

use annex_content::StaticCatalog;
use annex_core::{CatalogOracle, GameConfig, GameEnv, PcgRng};

/// Bundles the content catalog, tuning and RNG oracle.
#[derive(Clone, Debug)]
pub struct OracleBundle {
    catalog: Arc<StaticCatalog>,
    config: Arc<GameConfig>,
    rng: PcgRng,
}

impl OracleBundle {
    pub fn new(catalog: Arc<StaticCatalog>, config: GameConfig) -> Self {
        Self {
            catalog,
            config: Arc::new(config),
            // PcgRng is stateless
            rng: PcgRng,
        }
    }

    /// Borrows the oracles as a [`GameEnv`] for one engine call.
    pub fn as_game_env(&self) -> GameEnv<'_> {
        GameEnv::new(self.catalog.as_ref(), &self.rng, self.config.as_ref())
    }

    pub fn catalog(&self) -> &Arc<StaticCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Rule ids a fresh run starts with.
    pub fn default_rule_ids(&self) -> Vec<String> {
        self.catalog.default_rule_ids()
    }
}
