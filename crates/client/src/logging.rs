//! File logging for the terminal client.
//!
//! Stdout belongs to the game screen, so traces go to
//! `{data_local_dir}/logs/{session}/client.log` only.
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber. `RUST_LOG` directives are honoured on top
/// of the `info` default.
pub fn setup_logging(session_id: Option<&str>) -> Result<PathBuf> {
    let session_id = session_id.unwrap_or("default");

    let session_log_dir = log_directory()?.join(session_id);
    std::fs::create_dir_all(&session_log_dir)
        .with_context(|| format!("creating {}", session_log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "client.log");
    let (non_blocking_file, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Leak the guard to keep the file writer alive for the whole process
    std::mem::forget(_guard);

    let log_file = session_log_dir.join("client.log");
    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}", log_file.display());

    Ok(log_file)
}

/// Platform-specific log directory.
fn log_directory() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "mapleton-annex")
        .context("no home directory to place logs under")?;
    Ok(dirs.data_local_dir().join("logs"))
}
