//! Content factory for building the catalog from data files.

use std::path::{Path, PathBuf};

use annex_core::GameConfig;

use crate::catalog::StaticCatalog;
use crate::loaders::{
    ConfigLoader, EndingLoader, ExhibitLoader, InterruptLoader, LoadResult, LogLoader,
    LunchLoader, MailLoader, NoteLoader, RuleLoader, read_file, validate,
};

const BUNDLED_CONFIG: &str = include_str!("../../data/config.toml");
const BUNDLED_RULES: &str = include_str!("../../data/rules.ron");
const BUNDLED_INTERRUPTS: &str = include_str!("../../data/interrupts.ron");
const BUNDLED_EXHIBITS: &str = include_str!("../../data/exhibits.ron");
const BUNDLED_LOGS: &str = include_str!("../../data/logs.ron");
const BUNDLED_MAIL: &str = include_str!("../../data/mail.ron");
const BUNDLED_LUNCHES: &str = include_str!("../../data/lunches.ron");
const BUNDLED_NOTES: &str = include_str!("../../data/notes.ron");
const BUNDLED_ENDINGS: &str = include_str!("../../data/endings.ron");

/// Raw documents making up one content set.
struct Sources<'a> {
    rules: &'a str,
    interrupts: &'a str,
    exhibits: &'a str,
    logs: &'a str,
    mail: &'a str,
    lunches: &'a str,
    notes: &'a str,
    endings: &'a str,
}

impl Sources<'_> {
    fn build(&self) -> LoadResult<StaticCatalog> {
        let book = RuleLoader::parse(self.rules)?;
        let interrupts = InterruptLoader::parse(self.interrupts)?;
        let mailroom = MailLoader::parse(self.mail)?;

        let catalog = StaticCatalog {
            rules: book.rules,
            amendments: book.amendments,
            traps: interrupts.traps,
            events: interrupts.events,
            exhibits: ExhibitLoader::parse(self.exhibits)?,
            logs: LogLoader::parse(self.logs)?,
            emails: mailroom.emails,
            memos: mailroom.memos,
            lunches: LunchLoader::parse(self.lunches)?,
            sticky_notes: NoteLoader::parse(self.notes)?,
            endings: EndingLoader::parse(self.endings)?,
        };
        validate(&catalog)?;
        Ok(catalog)
    }
}

/// Content factory that loads all desk content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── rules.ron
/// ├── interrupts.ron
/// ├── exhibits.ron
/// ├── logs.ron
/// ├── mail.ron
/// ├── lunches.ron
/// ├── notes.ron
/// └── endings.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load desk tuning from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load every table and check cross references.
    pub fn load_catalog(&self) -> LoadResult<StaticCatalog> {
        let read = |name: &str| read_file(&self.data_dir.join(name));
        let (rules, interrupts, exhibits, logs) = (
            read("rules.ron")?,
            read("interrupts.ron")?,
            read("exhibits.ron")?,
            read("logs.ron")?,
        );
        let (mail, lunches, notes, endings) = (
            read("mail.ron")?,
            read("lunches.ron")?,
            read("notes.ron")?,
            read("endings.ron")?,
        );
        Sources {
            rules: &rules,
            interrupts: &interrupts,
            exhibits: &exhibits,
            logs: &logs,
            mail: &mail,
            lunches: &lunches,
            notes: &notes,
            endings: &endings,
        }
        .build()
    }

    /// Tuning compiled into the binary.
    pub fn bundled_config() -> LoadResult<GameConfig> {
        ConfigLoader::parse(BUNDLED_CONFIG)
    }

    /// Catalog compiled into the binary.
    pub fn bundled_catalog() -> LoadResult<StaticCatalog> {
        Sources {
            rules: BUNDLED_RULES,
            interrupts: BUNDLED_INTERRUPTS,
            exhibits: BUNDLED_EXHIBITS,
            logs: BUNDLED_LOGS,
            mail: BUNDLED_MAIL,
            lunches: BUNDLED_LUNCHES,
            notes: BUNDLED_NOTES,
            endings: BUNDLED_ENDINGS,
        }
        .build()
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annex_core::{CatalogOracle, Ending, LogPool};
    use strum::IntoEnumIterator;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn data_dir_matches_bundle() {
        let factory = ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
        let from_disk = factory.load_catalog().expect("data dir loads");
        let bundled = ContentFactory::bundled_catalog().expect("bundle loads");
        assert_eq!(from_disk.rules, bundled.rules);
        assert_eq!(from_disk.logs, bundled.logs);
        assert_eq!(
            factory.load_config().expect("config loads"),
            ContentFactory::bundled_config().expect("bundled config")
        );
    }

    #[test]
    fn missing_data_dir_is_an_error() {
        let factory = ContentFactory::new("/nonexistent/annex-data");
        let error = factory.load_catalog().unwrap_err();
        assert!(error.to_string().contains("rules.ron"));
    }

    #[test]
    fn bundled_tables_cover_the_run() {
        let catalog = ContentFactory::bundled_catalog().expect("bundle loads");
        let config = ContentFactory::bundled_config().expect("bundled config");

        assert_eq!(config, GameConfig::default());
        assert_eq!(catalog.rules.len(), 8);
        assert_eq!(catalog.default_rule_ids()[0], "R1");
        assert!(catalog.timeline_email(0).is_some());
        assert!(catalog.lunch("lunch-generic").is_ok());

        // Tutorial ends on the overload log the player is told to defer.
        let tutorial = catalog.pool(LogPool::Tutorial);
        assert_eq!(tutorial.len(), 4);
        assert_eq!(tutorial[1].id, "tut-ghost-1");
        assert_eq!(tutorial.last().map(|log| log.id.as_str()), Some("tut-04-defer"));

        for ending in Ending::iter() {
            assert!(catalog.ending_text(ending).is_some(), "{ending} has no text");
        }
    }

    #[test]
    fn narrative_ids_resolve() {
        let catalog = ContentFactory::bundled_catalog().expect("bundle loads");
        let memos = [
            "memo-probation",
            "memo-security-interview",
            "memo-hardship-review",
            "memo-empathy-warning",
            "memo-promo-junior",
            "memo-bind-fast",
            "memo-bind-slow",
            "memo-bind-perfect",
            "memo-bind-average",
            "memo-promo-senior",
            "memo-director-intervention",
            "memo-storage-audit",
            "memo-final-prep",
        ];
        for id in memos {
            assert!(catalog.memo(id).is_ok(), "missing memo {id}");
        }
        for rail in ["hardship", "archivist", "friend", "ladder"] {
            for step in 1..=2 {
                let id = format!("mog-{rail}-{step}");
                assert!(catalog.email(&id).is_ok(), "missing email {id}");
            }
        }
        for id in ["email-dir-speed", "email-dir-slow", "email-cal-debt", "email-cal-warning"] {
            assert!(catalog.email(id).is_ok(), "missing email {id}");
        }
        for id in [
            "lunch-mog-friend",
            "lunch-hardship-grind",
            "lunch-sana-artefact",
            "lunch-mog-appeal",
        ] {
            assert!(catalog.lunch(id).is_ok(), "missing lunch {id}");
        }
    }
}
