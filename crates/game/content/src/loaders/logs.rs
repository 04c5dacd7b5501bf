//! Log pool and exhibit dossier loaders.

use std::collections::HashSet;
use std::path::Path;

use annex_core::env::ExhibitDef;
use serde::{Deserialize, Serialize};

use crate::catalog::LogTables;
use crate::loaders::{LoadResult, parse_ron, read_file};

/// Loader for log pools from RON files.
pub struct LogLoader;

impl LogLoader {
    pub fn load(path: &Path) -> LoadResult<LogTables> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses the pools and rejects duplicate ids across them.
    ///
    /// History and dedup key on log ids, so a collision would hide one of
    /// the two logs forever.
    pub fn parse(content: &str) -> LoadResult<LogTables> {
        let tables: LogTables = parse_ron(content, "log tables")?;
        let mut seen = HashSet::new();
        for log in tables.iter() {
            if !seen.insert(log.id.as_str()) {
                anyhow::bail!("duplicate log id {}", log.id);
            }
        }
        Ok(tables)
    }
}

/// Exhibit dossier structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExhibitCatalog {
    pub exhibits: Vec<ExhibitDef>,
}

/// Loader for exhibit dossiers from RON files.
pub struct ExhibitLoader;

impl ExhibitLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ExhibitDef>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ExhibitDef>> {
        let catalog: ExhibitCatalog = parse_ron(content, "exhibit catalog")?;
        Ok(catalog.exhibits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annex_core::{ExhibitId, HazardTags, LogPool};

    #[test]
    fn missing_pools_are_empty() {
        let tables = LogLoader::parse(
            r#"(
                boot: [(id: "boot-1", exhibit: CUDDLER, text: "Coffee levels: 0%.", difficulty: 1, base_noise: 30)],
                ollie: [(id: "ollie-1", exhibit: HUMAN, text: "RUN.", difficulty: 3, base_noise: 95)],
            )"#,
        )
        .expect("valid tables");

        assert_eq!(tables.get(LogPool::Boot).len(), 1);
        assert!(tables.get(LogPool::Boot)[0].tags.is_empty());
        assert_eq!(tables.get(LogPool::Ollie)[0].base_noise, 95);
        assert!(tables.get(LogPool::Standard).is_empty());
    }

    #[test]
    fn duplicate_ids_across_pools_are_rejected() {
        let result = LogLoader::parse(
            r#"(
                boot: [(id: "x", exhibit: CUDDLER, text: "a", difficulty: 1, base_noise: 30)],
                flavor: [(id: "x", exhibit: HUMAN, text: "b", difficulty: 1, base_noise: 30)],
            )"#,
        );
        let error = result.unwrap_err();
        assert!(error.to_string().contains("duplicate log id x"));
    }

    #[test]
    fn exhibits_parse_with_tag_sets() {
        let exhibits = ExhibitLoader::parse(
            r#"(exhibits: [(id: DOOR_TESTER, name: "The Door-Tester", alias: "Probe Unit",
                 description: "Boundary probing unit.", tags: "TOOL_USE | BOUNDARY_TEST")])"#,
        )
        .expect("valid exhibits");

        assert_eq!(exhibits[0].id, ExhibitId::DoorTester);
        assert!(exhibits[0].behavior.is_empty());
        assert!(exhibits[0].tags.contains(HazardTags::BOUNDARY_TEST));
    }
}
