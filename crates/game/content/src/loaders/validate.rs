//! Cross-table consistency checks.
//!
//! Each loader validates its own file. These checks cover references that
//! span files: amendments naming rules, lunch follow-ups naming scenes, and
//! the pools the shift lifecycle cannot run without.

use std::collections::HashSet;

use annex_core::{CatalogOracle, LogPool};

use crate::catalog::StaticCatalog;
use crate::loaders::LoadResult;

pub fn validate(catalog: &StaticCatalog) -> LoadResult<()> {
    let rule_ids: HashSet<_> = catalog.rules.iter().map(|rule| rule.id.as_str()).collect();

    for amendment in &catalog.amendments {
        if !rule_ids.contains(amendment.rule_id.as_str()) {
            anyhow::bail!(
                "amendment {} targets unknown rule {}",
                amendment.id,
                amendment.rule_id
            );
        }
    }
    for rule in &catalog.rules {
        if let Some(conflict) = &rule.conflict_id {
            if !rule_ids.contains(conflict.as_str()) {
                anyhow::bail!("rule {} conflicts with unknown rule {}", rule.id, conflict);
            }
        }
    }

    for lunch in &catalog.lunches {
        for next in lunch.choices.iter().filter_map(|choice| choice.next.as_deref()) {
            if catalog.lunch(next).is_err() {
                anyhow::bail!("lunch scene {} continues to unknown scene {}", lunch.id, next);
            }
        }
    }

    for pool in [LogPool::Boot, LogPool::Tutorial, LogPool::Ollie] {
        if catalog.pool(pool).is_empty() {
            anyhow::bail!("log pool {} is empty", pool);
        }
    }

    let mut email_ids = HashSet::new();
    for email in &catalog.emails {
        if !email_ids.insert(email.id.as_str()) {
            anyhow::bail!("duplicate email id {}", email.id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use annex_core::env::{AmendmentCost, AmendmentDef};

    #[test]
    fn dangling_amendment_is_reported() {
        let mut catalog = bundled();
        catalog.amendments.push(AmendmentDef {
            id: "AM-9".into(),
            rule_id: "R99".into(),
            new_text: String::new(),
            reason: String::new(),
            cost: AmendmentCost::Influence,
        });
        let error = validate(&catalog).unwrap_err();
        assert!(error.to_string().contains("unknown rule R99"));
    }

    #[test]
    fn empty_boot_pool_is_reported() {
        let mut catalog = bundled();
        catalog.logs.boot.clear();
        let error = validate(&catalog).unwrap_err();
        assert!(error.to_string().contains("boot"));
    }

    #[test]
    fn bundled_content_is_consistent() {
        validate(&bundled()).expect("bundled content validates");
    }

    fn bundled() -> StaticCatalog {
        crate::ContentFactory::bundled_catalog().expect("bundled content parses")
    }
}
