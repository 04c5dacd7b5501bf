//! Top-level client orchestrating the Runtime and Frontend layers.
//!
//! # Architecture
//!
//! ```text
//! Client (Top-level container)
//!   ├─→ Runtime (Game logic, workers and state ownership)
//!   └─→ Frontend (UI layer, talks to the runtime through RuntimeHandle only)
//! ```
//!
//! The runtime is fully started by `client_bootstrap::RuntimeBuilder`; the
//! client hands a handle to the frontend and shuts the workers down once the
//! frontend returns.

mod builder;
pub mod logging;
pub mod terminal;

pub use builder::ClientBuilder;
pub use terminal::TerminalFrontend;

use anyhow::Result;
use async_trait::async_trait;
use runtime::RuntimeHandle;

/// Frontend abstraction for UI layers.
///
/// Frontends do NOT own the Runtime. They receive a handle, subscribe to the
/// topics they render and submit player intents through it.
#[async_trait]
pub trait Frontend: Send {
    /// Run the frontend loop until the player quits.
    async fn run(&mut self, handle: RuntimeHandle) -> Result<()>;
}

/// Top-level client container.
///
/// # Lifecycle
///
/// 1. `Client::builder()` receives an already running runtime and a frontend
/// 2. `Client::run()` transfers control to the frontend
/// 3. On frontend exit every runtime worker is stopped and awaited
pub struct Client {
    runtime: runtime::Runtime,
    frontend: Box<dyn Frontend>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Run the frontend, then shut the runtime down.
    ///
    /// A frontend error is reported after shutdown so the final checkpoint
    /// is still written.
    pub async fn run(self) -> Result<()> {
        let handle = self.runtime.handle();

        let mut frontend = self.frontend;
        let frontend_result = frontend.run(handle).await;

        if let Err(e) = self.runtime.shutdown().await {
            tracing::error!("Runtime shutdown error: {}", e);
        }

        frontend_result
    }
}
