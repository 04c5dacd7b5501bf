//! Mapleton Annex terminal client.
//!
//! This binary is the composition root that assembles:
//! 1. Runtime (game logic and workers) via `client_bootstrap::RuntimeBuilder`
//! 2. Frontend (line-oriented terminal UI)
//!
//! Configuration comes from the environment (see `CliConfig::from_env`);
//! a `.env` file in the working directory is honoured.

use annex_client::{Client, TerminalFrontend, logging};
use anyhow::Result;
use client_bootstrap::{CliConfig, RuntimeBuilder};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let config = CliConfig::from_env();

    // 2. Setup logging
    logging::setup_logging(config.session_id.as_deref())?;

    tracing::info!("Starting Mapleton Annex");
    tracing::info!("Persistence: {}", config.enable_persistence);
    tracing::info!("Content provider: {}", config.use_provider);

    // 3. Build Runtime (independent layer)
    let message_capacity = config.message_capacity;
    let setup = RuntimeBuilder::new(config).build().await?;
    tracing::info!("Runtime built, save slot: {:?}", setup.session_id);

    // 4. Build Frontend (independent layer)
    let frontend = TerminalFrontend::new(setup.oracles.clone(), message_capacity);

    // 5. Build and run
    let client = Client::builder()
        .runtime(setup.runtime)
        .frontend(frontend)
        .build()?;

    client.run().await?;

    tracing::info!("Client shutdown complete");
    Ok(())
}
