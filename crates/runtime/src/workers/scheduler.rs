//! Wall-clock driver for the game clock.
//!
//! Turns real elapsed time into `Tick` intents. Rejections are expected
//! (ticks are refused outside a shift) and only traced.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, trace, warn};

use crate::api::{RuntimeError, RuntimeHandle};

pub struct SchedulerWorker {
    handle: RuntimeHandle,
    tick_interval: Duration,
    tick_scale: u32,
    shutdown_rx: watch::Receiver<bool>,
}

impl SchedulerWorker {
    pub fn new(
        handle: RuntimeHandle,
        tick_interval: Duration,
        tick_scale: u32,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            handle,
            tick_interval,
            tick_scale: tick_scale.max(1),
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        loop {
            tokio::select! {
                now = ticker.tick() => {
                    let elapsed = now.saturating_duration_since(last);
                    last = now;
                    if !self.tick(elapsed).await {
                        break;
                    }
                }
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        debug!(target: "runtime::scheduler", "SchedulerWorker stopped");
    }

    /// Returns false once the simulation worker is gone.
    async fn tick(&self, elapsed: Duration) -> bool {
        let elapsed_ms = elapsed.as_millis() as u64 * u64::from(self.tick_scale);
        if elapsed_ms == 0 {
            return true;
        }

        match self.handle.tick(elapsed_ms).await {
            Ok(_) => true,
            Err(err) if err.is_rejection() => {
                trace!(target: "runtime::scheduler", error = %err, "Tick rejected");
                true
            }
            Err(RuntimeError::CommandChannelClosed | RuntimeError::ReplyChannelClosed(_)) => {
                debug!(target: "runtime::scheduler", "Simulation worker gone");
                false
            }
            Err(err) => {
                warn!(target: "runtime::scheduler", error = %err, "Tick failed");
                true
            }
        }
    }
}
