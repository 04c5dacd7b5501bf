//! In-memory content catalog.
//!
//! [`StaticCatalog`] owns every table the reducer reads and answers
//! [`CatalogOracle`] lookups. It is immutable once built; the runtime shares
//! it behind an `Arc`.

use annex_core::env::{
    AmendmentDef, Email, EndingText, EventDef, ExhibitDef, LunchEvent, ReviewMemo, RuleDef,
    StickyNote, TrapDef,
};
use annex_core::{CatalogOracle, ExhibitId, LogItem, LogPool};

/// Log tables keyed by pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LogTables {
    pub boot: Vec<LogItem>,
    pub tutorial: Vec<LogItem>,
    pub flavor: Vec<LogItem>,
    pub human: Vec<LogItem>,
    pub ollie: Vec<LogItem>,
    pub archive: Vec<LogItem>,
    pub standard: Vec<LogItem>,
    pub redactable: Vec<LogItem>,
    pub rail_ladder: Vec<LogItem>,
    pub rail_hardship: Vec<LogItem>,
    pub rail_archivist: Vec<LogItem>,
    pub rail_sympathizer: Vec<LogItem>,
}

impl LogTables {
    pub fn get(&self, pool: LogPool) -> &[LogItem] {
        match pool {
            LogPool::Boot => &self.boot,
            LogPool::Tutorial => &self.tutorial,
            LogPool::Flavor => &self.flavor,
            LogPool::Human => &self.human,
            LogPool::Ollie => &self.ollie,
            LogPool::Archive => &self.archive,
            LogPool::Standard => &self.standard,
            LogPool::Redactable => &self.redactable,
            LogPool::RailLadder => &self.rail_ladder,
            LogPool::RailHardship => &self.rail_hardship,
            LogPool::RailArchivist => &self.rail_archivist,
            LogPool::RailSympathizer => &self.rail_sympathizer,
        }
    }

    /// Every log across all pools.
    pub fn iter(&self) -> impl Iterator<Item = &LogItem> {
        [
            &self.boot,
            &self.tutorial,
            &self.flavor,
            &self.human,
            &self.ollie,
            &self.archive,
            &self.standard,
            &self.redactable,
            &self.rail_ladder,
            &self.rail_hardship,
            &self.rail_archivist,
            &self.rail_sympathizer,
        ]
        .into_iter()
        .flatten()
    }
}

/// Content catalog backed by owned tables.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    pub rules: Vec<RuleDef>,
    pub amendments: Vec<AmendmentDef>,
    pub traps: Vec<TrapDef>,
    pub events: Vec<EventDef>,
    pub exhibits: Vec<ExhibitDef>,
    pub logs: LogTables,
    pub emails: Vec<Email>,
    pub memos: Vec<ReviewMemo>,
    pub lunches: Vec<LunchEvent>,
    pub sticky_notes: Vec<StickyNote>,
    pub endings: Vec<EndingText>,
}

impl StaticCatalog {
    /// Logs in a pool written for one exhibit.
    pub fn pool_for(&self, pool: LogPool, exhibit: ExhibitId) -> Vec<&LogItem> {
        self.logs
            .get(pool)
            .iter()
            .filter(|log| log.exhibit == exhibit)
            .collect()
    }
}

impl CatalogOracle for StaticCatalog {
    fn rules(&self) -> &[RuleDef] {
        &self.rules
    }

    fn amendments(&self) -> &[AmendmentDef] {
        &self.amendments
    }

    fn traps(&self) -> &[TrapDef] {
        &self.traps
    }

    fn events(&self) -> &[EventDef] {
        &self.events
    }

    fn exhibits(&self) -> &[ExhibitDef] {
        &self.exhibits
    }

    fn pool(&self, pool: LogPool) -> &[LogItem] {
        self.logs.get(pool)
    }

    fn emails(&self) -> &[Email] {
        &self.emails
    }

    fn memos(&self) -> &[ReviewMemo] {
        &self.memos
    }

    fn lunches(&self) -> &[LunchEvent] {
        &self.lunches
    }

    fn sticky_notes(&self) -> &[StickyNote] {
        &self.sticky_notes
    }

    fn endings(&self) -> &[EndingText] {
        &self.endings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annex_core::HazardTags;

    #[test]
    fn pools_route_to_their_tables() {
        let mut catalog = StaticCatalog::default();
        catalog.logs.ollie.push(LogItem::new(
            "ollie-1",
            ExhibitId::Human,
            "RUN.",
            HazardTags::empty(),
        ));
        catalog.logs.standard.push(LogItem::new(
            "j-t1-s1",
            ExhibitId::Judge,
            "Score: 10/10.",
            HazardTags::empty(),
        ));

        assert_eq!(catalog.pool(LogPool::Ollie).len(), 1);
        assert!(catalog.pool(LogPool::Boot).is_empty());
        assert_eq!(catalog.pool_for(LogPool::Standard, ExhibitId::Judge).len(), 1);
        assert!(catalog.pool_for(LogPool::Standard, ExhibitId::Mog).is_empty());
        assert_eq!(catalog.logs.iter().count(), 2);
    }
}
