//! Helpers for constructing oracle bundles consumed by the runtime.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use annex_content::ContentFactory;

// Re-export OracleBundle from runtime
pub use runtime::OracleBundle;

pub trait OracleFactory: Send + Sync {
    fn build(&self) -> Result<OracleBundle>;
}

/// Oracle factory backed by the tables compiled into the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct BundledOracleFactory;

impl OracleFactory for BundledOracleFactory {
    fn build(&self) -> Result<OracleBundle> {
        let config = ContentFactory::bundled_config().context("bundled config.toml")?;
        let catalog = ContentFactory::bundled_catalog().context("bundled content tables")?;
        Ok(OracleBundle::new(Arc::new(catalog), config))
    }
}

/// Oracle factory that loads game content from data files.
///
/// Uses the annex-content loaders to read RON/TOML files, so writers can
/// edit logs, mail and tuning without rebuilding.
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
#[derive(Clone, Debug)]
pub struct ContentOracleFactory {
    data_dir: PathBuf,
}

impl ContentOracleFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }
}

impl OracleFactory for ContentOracleFactory {
    fn build(&self) -> Result<OracleBundle> {
        if !self.data_dir.exists() {
            bail!(
                "Content data directory not found: {}. Unset ANNEX_CONTENT_DIR to use the bundled tables.",
                self.data_dir.display()
            );
        }

        let factory = ContentFactory::new(&self.data_dir);

        let config = factory
            .load_config()
            .with_context(|| format!("loading config.toml from {}", self.data_dir.display()))?;
        let catalog = factory
            .load_catalog()
            .with_context(|| format!("loading content tables from {}", self.data_dir.display()))?;

        tracing::info!("Loaded content from {}", self.data_dir.display());

        Ok(OracleBundle::new(Arc::new(catalog), config))
    }
}
