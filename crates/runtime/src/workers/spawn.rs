//! Spawn worker: turns `SpawnDue` wake-ups into queued logs.
//!
//! The worker asks the simulation for a [`SpawnPlan`], produces the log
//! (scripted, generated, or from the static fallback) and submits it as an
//! `EnqueueLog` intent. Only one plan is in flight at a time. Results that
//! arrive after the shift moved on are refused by the reducer and dropped
//! here.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use annex_core::{
    DirectorInstruction, EnqueueLogAction, LogItem, ProviderContext, ProviderTelemetry, SpawnPlan,
    SpawnSource,
};

use crate::api::{ContentProvider, GeneratedLog, ProviderError, RuntimeError, RuntimeHandle};
use crate::events::{ContentEvent, Event, EventBus};
use crate::providers::FallbackProvider;

/// Where a spawned log came from.
struct Produced {
    log: LogItem,
    telemetry: ProviderTelemetry,
    source: &'static str,
    fallback: bool,
}

pub struct SpawnWorker {
    handle: RuntimeHandle,
    provider: Option<Arc<dyn ContentProvider>>,
    fallback: FallbackProvider,
    provider_timeout: Duration,
    event_bus: EventBus,
    spawn_rx: mpsc::Receiver<()>,
    shutdown_rx: watch::Receiver<bool>,
}

impl SpawnWorker {
    pub fn new(
        handle: RuntimeHandle,
        provider: Option<Arc<dyn ContentProvider>>,
        fallback: FallbackProvider,
        provider_timeout: Duration,
        spawn_rx: mpsc::Receiver<()>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let event_bus = handle.event_bus().clone();
        Self {
            handle,
            provider,
            fallback,
            provider_timeout,
            event_bus,
            spawn_rx,
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                signal = self.spawn_rx.recv() => {
                    if signal.is_none() {
                        break;
                    }
                    if !self.spawn_once().await {
                        break;
                    }
                    // Wake-ups that arrived while busy are dropped.
                    while self.spawn_rx.try_recv().is_ok() {}
                }
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        debug!(target: "runtime::spawn", "SpawnWorker stopped");
    }

    /// Plans, produces and submits one log. Returns false once the
    /// simulation worker is gone.
    async fn spawn_once(&self) -> bool {
        let plan = match self.handle.plan_spawn().await {
            Ok(Some(plan)) => plan,
            Ok(None) => {
                debug!(target: "runtime::spawn", "Nothing to spawn");
                return true;
            }
            Err(err) => {
                debug!(target: "runtime::spawn", error = %err, "Simulation worker gone");
                return false;
            }
        };

        let SpawnPlan {
            serial,
            source,
            context,
        } = plan;

        let produced = match source {
            SpawnSource::Scripted(log) => Produced {
                log,
                telemetry: ProviderTelemetry::default(),
                source: "script",
                fallback: false,
            },
            SpawnSource::Generate(instruction) => {
                match self.generate(&instruction, &context).await {
                    Ok(produced) => produced,
                    Err(err) => {
                        warn!(
                            target: "runtime::spawn",
                            target_exhibit = %instruction.target,
                            intent = %instruction.intent,
                            error = %err,
                            "No log could be produced"
                        );
                        self.event_bus
                            .publish(Event::Content(ContentEvent::SpawnDropped {
                                reason: err.to_string(),
                            }));
                        return true;
                    }
                }
            }
        };

        self.submit(serial, produced).await
    }

    /// Asks the external provider when the run allows it, otherwise (or when
    /// it fails) the static fallback.
    async fn generate(
        &self,
        instruction: &DirectorInstruction,
        context: &ProviderContext,
    ) -> Result<Produced, ProviderError> {
        let provider = match &self.provider {
            Some(provider) if context.use_provider => provider,
            _ => {
                let generated = self.fallback.generate(instruction, context).await?;
                return Ok(Produced {
                    log: generated.log,
                    telemetry: ProviderTelemetry::default(),
                    source: self.fallback.name(),
                    fallback: false,
                });
            }
        };

        let attempt = tokio::time::timeout(
            self.provider_timeout,
            provider.generate(instruction, context),
        )
        .await
        .unwrap_or_else(|_| {
            Err(ProviderError::Timeout(
                self.provider_timeout.as_millis() as u64,
            ))
        });

        match attempt {
            Ok(GeneratedLog {
                log,
                tokens_used,
                is_error,
            }) => Ok(Produced {
                log,
                telemetry: ProviderTelemetry {
                    provider_call: true,
                    tokens_used,
                    is_error,
                },
                source: provider.name(),
                fallback: false,
            }),
            Err(err) => {
                warn!(
                    target: "runtime::spawn",
                    provider = provider.name(),
                    error = %err,
                    "Provider failed, answering from the static table"
                );
                let generated = self.fallback.generate(instruction, context).await?;
                Ok(Produced {
                    log: generated.log,
                    telemetry: ProviderTelemetry {
                        provider_call: true,
                        tokens_used: 0,
                        is_error: true,
                    },
                    source: self.fallback.name(),
                    fallback: true,
                })
            }
        }
    }

    async fn submit(&self, serial: u64, produced: Produced) -> bool {
        let id = produced.log.id.clone();
        let exhibit = produced.log.exhibit;
        let tokens_used = produced.telemetry.tokens_used;
        let action =
            EnqueueLogAction::new(serial, produced.log).with_telemetry(produced.telemetry);

        match self.handle.enqueue_log(action).await {
            Ok(_) => {
                info!(
                    target: "runtime::spawn",
                    id = %id,
                    exhibit = %exhibit,
                    source = produced.source,
                    "Log spawned"
                );
                self.event_bus
                    .publish(Event::Content(ContentEvent::LogSpawned {
                        id,
                        exhibit,
                        source: produced.source.to_string(),
                        tokens_used,
                        fallback: produced.fallback,
                    }));
                true
            }
            Err(err) if err.is_rejection() => {
                debug!(
                    target: "runtime::spawn",
                    id = %id,
                    code = err.error_code(),
                    "Late spawn dropped"
                );
                self.event_bus
                    .publish(Event::Content(ContentEvent::SpawnDropped {
                        reason: err.to_string(),
                    }));
                true
            }
            Err(RuntimeError::CommandChannelClosed | RuntimeError::ReplyChannelClosed(_)) => false,
            Err(err) => {
                warn!(target: "runtime::spawn", error = %err, "Enqueue failed");
                true
            }
        }
    }
}
