//! Read-only inputs to the reducer.
//!
//! [`GameEnv`] bundles the content catalog, the RNG oracle and the tuning
//! config so transitions can reach everything they need without coupling to
//! concrete implementations.
mod catalog;
mod rng;

pub use catalog::{
    AmendmentCost, AmendmentDef, CatalogError, CatalogOracle, Email, EmailEffect, EmailOption,
    EndingText, EventDef, EventKind, ExhibitDef, LogPool, LunchChoice, LunchEffect, LunchEvent,
    LunchVariant, ReviewChoice, ReviewMemo, ReviewOption, RuleDef, StickyNote, TrapDef,
    TrapEffect,
};
pub use rng::{Dice, PcgRng, RngOracle, RngStream, compute_seed};

use crate::config::GameConfig;
use crate::state::GameState;

/// Aggregates the read-only oracles required by the engine.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    catalog: &'a dyn CatalogOracle,
    rng: &'a dyn RngOracle,
    config: &'a GameConfig,
}

impl<'a> GameEnv<'a> {
    pub fn new(
        catalog: &'a dyn CatalogOracle,
        rng: &'a dyn RngOracle,
        config: &'a GameConfig,
    ) -> Self {
        Self {
            catalog,
            rng,
            config,
        }
    }

    pub fn catalog(&self) -> &'a dyn CatalogOracle {
        self.catalog
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    /// Roller for the intent currently applied to `state`.
    pub fn dice(&self, state: &GameState, stream: RngStream) -> Dice<'a> {
        Dice::new(self.rng, state.seed, state.nonce, stream)
    }
}

impl core::fmt::Debug for GameEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameEnv")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
