//! Content loaders for reading desk data from files.
//!
//! This module provides loaders that convert RON/TOML files into the tables
//! behind [`crate::StaticCatalog`]. Every loader can read from a path or parse
//! an in-memory string, which is how the embedded bundle is built.

pub mod config;
pub mod factory;
pub mod interrupts;
pub mod logs;
pub mod rules;
pub mod story;
pub mod validate;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use interrupts::InterruptLoader;
pub use logs::{ExhibitLoader, LogLoader};
pub use rules::RuleLoader;
pub use story::{EndingLoader, LunchLoader, MailLoader, NoteLoader};
pub use validate::validate;

use std::path::Path;

use ron::extensions::Extensions;
use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Parses a RON document, naming the table in the error.
///
/// Newtypes are unwrapped so flag sets read as `tags: "A | B"`.
pub(crate) fn parse_ron<T: DeserializeOwned>(content: &str, table: &str) -> LoadResult<T> {
    ron::Options::default()
        .with_default_extension(Extensions::UNWRAP_NEWTYPES)
        .from_str(content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} RON: {}", table, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use annex_core::HazardTags;

    #[derive(serde::Deserialize)]
    struct Tagged {
        tags: HazardTags,
    }

    #[test]
    fn flag_sets_parse_from_bare_strings() {
        let tagged: Tagged =
            parse_ron(r#"(tags: "NETWORK_REQUEST | EXTERNAL_LINK")"#, "tagged").expect("tags parse");
        assert_eq!(
            tagged.tags,
            HazardTags::NETWORK_REQUEST | HazardTags::EXTERNAL_LINK
        );
    }
}
