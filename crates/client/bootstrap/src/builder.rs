//! Builds the runtime, oracles, and config bundle used by front-ends.
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use runtime::{FileStateRepository, Runtime, RuntimeConfig};

use crate::config::CliConfig;
use crate::oracles::{BundledOracleFactory, ContentOracleFactory, OracleBundle, OracleFactory};
use crate::session::find_latest_session;

const DEFAULT_SESSION: &str = "default";

/// Builder that assembles runtime state, oracles, and configuration for clients.
pub struct RuntimeBuilder {
    config: CliConfig,
    oracle_factory: Arc<dyn OracleFactory>,
    runtime_config: RuntimeConfig,
}

impl RuntimeBuilder {
    pub fn new(config: CliConfig) -> Self {
        let oracle_factory: Arc<dyn OracleFactory> = match &config.content_dir {
            Some(dir) => Arc::new(ContentOracleFactory::new(dir.clone())),
            None => Arc::new(BundledOracleFactory),
        };
        Self {
            config,
            oracle_factory,
            runtime_config: RuntimeConfig::default(),
        }
    }

    /// Provide a custom oracle factory.
    pub fn oracle_factory(mut self, factory: impl OracleFactory + 'static) -> Self {
        self.oracle_factory = Arc::new(factory);
        self
    }

    /// Override runtime tuning (intervals, buffers). Seed, provider and tick
    /// scale still come from the client config.
    pub fn runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    pub async fn build(self) -> Result<RuntimeSetup> {
        let oracles = self.oracle_factory.build()?;

        let runtime_config = RuntimeConfig {
            seed: self.config.seed,
            use_provider: self.config.use_provider,
            tick_scale: self.config.tick_scale,
            ..self.runtime_config
        };

        let mut builder = Runtime::builder()
            .config(runtime_config)
            .oracles(oracles.clone());

        let mut session_id = None;
        if self.config.enable_persistence {
            let save_dir = match &self.config.save_data_dir {
                Some(dir) => dir.clone(),
                None => FileStateRepository::default_dir()?,
            };
            let slot = resolve_session(&self.config, &save_dir);
            tracing::info!("Save slot: {}/{}.json", save_dir.display(), slot);

            let repository = FileStateRepository::new(&save_dir, slot.clone())?;
            builder = builder.repository(Arc::new(repository));
            session_id = Some(slot);
        }

        // Build the runtime
        let runtime = builder.build().await?;

        Ok(RuntimeSetup {
            config: self.config,
            oracles,
            runtime,
            session_id,
        })
    }
}

/// Explicit slot, else the latest save in the directory, else `default`.
fn resolve_session(config: &CliConfig, save_dir: &Path) -> String {
    if let Some(id) = &config.session_id {
        return id.clone();
    }
    match find_latest_session(save_dir) {
        Ok(Some(latest)) => latest.session_id,
        Ok(None) => DEFAULT_SESSION.to_string(),
        Err(err) => {
            tracing::warn!("Could not scan saves in {}: {}", save_dir.display(), err);
            DEFAULT_SESSION.to_string()
        }
    }
}

pub struct RuntimeSetup {
    pub config: CliConfig,
    pub oracles: OracleBundle,
    pub runtime: Runtime,
    /// Save slot in use, when persistence is enabled.
    pub session_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_with_bundled_content_and_a_fresh_slot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = CliConfig {
            save_data_dir: Some(dir.path().to_path_buf()),
            seed: Some(5),
            ..CliConfig::default()
        };

        let setup = RuntimeBuilder::new(config)
            .runtime_config(RuntimeConfig {
                enable_scheduler: false,
                ..RuntimeConfig::default()
            })
            .build()
            .await
            .expect("setup");
        assert_eq!(setup.session_id.as_deref(), Some(DEFAULT_SESSION));

        let state = setup.runtime.handle().query_state().await.expect("state");
        assert_eq!(state.seed, 5);
        assert_eq!(state.shift_index, 0);

        setup.runtime.shutdown().await.expect("shutdown");
    }

    #[tokio::test]
    async fn persistence_can_be_disabled() {
        let config = CliConfig {
            enable_persistence: false,
            ..CliConfig::default()
        };
        let setup = RuntimeBuilder::new(config)
            .runtime_config(RuntimeConfig {
                enable_scheduler: false,
                ..RuntimeConfig::default()
            })
            .build()
            .await
            .expect("setup");
        assert!(setup.session_id.is_none());
        setup.runtime.shutdown().await.expect("shutdown");
    }
}
