//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Configuration required to bootstrap a client runtime and UI.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub enable_persistence: bool,
    /// Save slot name. When unset the most recent slot is resumed, or
    /// `default` is created.
    pub session_id: Option<String>,
    pub save_data_dir: Option<PathBuf>,
    /// Content directory. The bundled tables are used when unset.
    pub content_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub use_provider: bool,
    pub tick_scale: u32,
    /// Recent messages kept by the terminal UI.
    pub message_capacity: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            enable_persistence: true,
            session_id: None,
            save_data_dir: None,
            content_dir: None,
            seed: None,
            use_provider: false,
            tick_scale: 1,
            message_capacity: 64,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ANNEX_ENABLE_PERSISTENCE` - Save between shifts (default: true)
    /// - `ANNEX_SESSION_ID` - Save slot name (default: latest, else `default`)
    /// - `ANNEX_SAVE_DIR` - Directory for saves (default: platform-specific)
    /// - `ANNEX_CONTENT_DIR` - Content data directory (default: bundled tables)
    /// - `ANNEX_SEED` - Seed for a fresh run (default: random)
    /// - `ANNEX_USE_PROVIDER` - Allow the external content provider (default: false)
    /// - `ANNEX_TICK_SCALE` - Game milliseconds per real millisecond (default: 1)
    /// - `ANNEX_MESSAGE_CAPACITY` - Message log capacity (default: 64)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(enable) = read_env::<bool>("ANNEX_ENABLE_PERSISTENCE") {
            config.enable_persistence = enable;
        }

        config.session_id = env::var("ANNEX_SESSION_ID")
            .ok()
            .filter(|id| !id.trim().is_empty());
        config.save_data_dir = env::var("ANNEX_SAVE_DIR").ok().map(PathBuf::from);
        config.content_dir = env::var("ANNEX_CONTENT_DIR").ok().map(PathBuf::from);
        config.seed = read_env::<u64>("ANNEX_SEED");

        if let Some(enable) = read_env::<bool>("ANNEX_USE_PROVIDER") {
            config.use_provider = enable;
        } else if env::var("ANNEX_USE_PROVIDER").is_ok() {
            // Also accept just setting the variable without value as "true"
            config.use_provider = true;
        }

        if let Some(scale) = read_env::<u32>("ANNEX_TICK_SCALE") {
            config.tick_scale = scale.max(1);
        }

        if let Some(capacity) = read_env::<usize>("ANNEX_MESSAGE_CAPACITY") {
            config.message_capacity = capacity.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
