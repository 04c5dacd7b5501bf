//! House rule loader.
//!
//! Loads the noticeboard and the amendments Mog may propose against it.

use std::path::Path;

use annex_core::env::{AmendmentDef, RuleDef};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Rule book structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleBook {
    pub rules: Vec<RuleDef>,
    #[serde(default)]
    pub amendments: Vec<AmendmentDef>,
}

/// Loader for the rule book from RON files.
pub struct RuleLoader;

impl RuleLoader {
    pub fn load(path: &Path) -> LoadResult<RuleBook> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<RuleBook> {
        let book: RuleBook = parse_ron(content, "rule book")?;
        if book.rules.is_empty() {
            anyhow::bail!("rule book has no rules");
        }
        Ok(book)
    }
}
