//! Simulation worker that owns the authoritative [`annex_core::GameState`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), executes
//! intents via [`annex_core::GameEngine`], and publishes events to the
//! EventBus.

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, trace};

use annex_core::{
    ExecuteError, ExecutionOutcome, GameEngine, GameError, GameState, Intent, Notice, SpawnPlan,
    TransitionPhase, shift, story,
};

use crate::api::{Result, RuntimeError, Snapshot};
use crate::events::{Event, EventBus, GameStateEvent};
use crate::oracle::OracleBundle;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Execute an intent against the current state.
    Execute {
        intent: Intent,
        reply: oneshot::Sender<Result<ExecutionOutcome>>,
    },
    /// Ask the shift what it needs next. Pure; does not touch the state.
    PlanSpawn {
        reply: oneshot::Sender<Option<SpawnPlan>>,
    },
    /// State plus the derived values the presentation layer renders.
    Snapshot { reply: oneshot::Sender<Snapshot> },
    /// Query the current game state (read-only).
    QueryState { reply: oneshot::Sender<GameState> },
}

/// Background task that processes gameplay commands.
///
/// The worker is the only writer of the state. Every intent runs on a
/// working copy which replaces the state only when the engine accepts it, so
/// a rejected intent leaves no trace.
pub struct SimulationWorker {
    state: GameState,
    oracles: OracleBundle,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    spawn_tx: mpsc::Sender<()>,
    shutdown_rx: watch::Receiver<bool>,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        state: GameState,
        oracles: OracleBundle,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        spawn_tx: mpsc::Sender<()>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        info!(
            target: "runtime::worker",
            run_id = %state.run_id,
            shift = state.shift_index,
            phase = state.phase.as_str(),
            "SimulationWorker initialized"
        );

        Self {
            state,
            oracles,
            command_rx,
            event_bus,
            spawn_tx,
            shutdown_rx,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        // A resumed mid-shift state is impossible, but an explicit initial
        // state may be one; let the spawn worker check.
        if self.state.phase.is_mid_shift() {
            self.signal_spawn();
        }

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd);
                }
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }
                else => break,
            }
        }

        debug!(target: "runtime::worker", nonce = self.state.nonce, "SimulationWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Execute { intent, reply } => {
                let result = self.execute_intent(intent);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "Execute reply channel closed (caller dropped)");
                }
            }
            Command::PlanSpawn { reply } => {
                let plan = shift::plan_spawn(&self.state, &self.oracles.as_game_env());
                if reply.send(plan).is_err() {
                    debug!(target: "runtime::worker", "PlanSpawn reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.snapshot()).is_err() {
                    debug!(target: "runtime::worker", "Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!(target: "runtime::worker", "QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn snapshot(&self) -> Snapshot {
        let env = self.oracles.as_game_env();
        Snapshot {
            state: self.state.clone(),
            current_log: self.state.work.current.clone(),
            is_processing: false,
            sticky_note: story::sticky_note(&self.state, &env).cloned(),
        }
    }

    /// Executes an intent and publishes the result.
    ///
    /// This is the ONLY method that calls `GameEngine::execute()`.
    fn execute_intent(&mut self, intent: Intent) -> Result<ExecutionOutcome> {
        let env = self.oracles.as_game_env();
        let mut working_state = self.state.clone();

        let outcome = match GameEngine::new(&mut working_state).execute(env, &intent) {
            Ok(outcome) => outcome,
            Err(error) => {
                self.handle_execute_error(&intent, &error);
                return Err(RuntimeError::Rejected {
                    intent: intent.label(),
                    error,
                });
            }
        };

        // Commit working state
        self.state = working_state;

        if matches!(intent, Intent::System(_)) && outcome.notices.is_empty() {
            trace!(
                target: "runtime::worker",
                intent = intent.label(),
                nonce = outcome.nonce,
                "Intent applied"
            );
        } else {
            debug!(
                target: "runtime::worker",
                intent = intent.label(),
                nonce = outcome.nonce,
                phase = self.state.phase.as_str(),
                "Intent applied"
            );
        }

        for notice in &outcome.notices {
            self.handle_notice(notice);
        }

        self.event_bus
            .publish(Event::GameState(GameStateEvent::IntentApplied {
                nonce: outcome.nonce,
                intent,
                feedback: outcome.feedback.clone(),
                notices: outcome.notices.clone(),
                clock_ms: self.state.clock_ms,
            }));

        Ok(outcome)
    }

    fn handle_notice(&self, notice: &Notice) {
        match notice {
            Notice::SpawnDue => self.signal_spawn(),
            Notice::ShiftStarted { shift_index } => {
                info!(target: "runtime::worker", shift = shift_index, "Shift started");
            }
            Notice::ShiftFinalized { shift_index } => {
                info!(
                    target: "runtime::worker",
                    shift = shift_index,
                    rank = ?self.state.rank,
                    "Shift finalized"
                );
            }
            Notice::RankChanged { rank } => {
                info!(target: "runtime::worker", rank = ?rank, "Rank changed");
            }
            Notice::OllieModeEnabled => {
                info!(target: "runtime::worker", "Ollie mode enabled");
            }
            Notice::GameOver { ending } => {
                info!(target: "runtime::worker", ending = ?ending, "Run ended");
            }
            other => {
                debug!(target: "runtime::worker", notice = ?other, "Notice");
            }
        }
    }

    /// Wakes the spawn worker. A full channel means a wake-up is already
    /// pending, so the extra one is dropped.
    fn signal_spawn(&self) {
        if self.spawn_tx.try_send(()).is_err() {
            trace!(target: "runtime::worker", "Spawn already pending");
        }
    }

    fn handle_execute_error(&self, intent: &Intent, error: &ExecuteError) {
        match error.phase() {
            Some(TransitionPhase::PreValidate) | Some(TransitionPhase::Apply) => {
                debug!(
                    target: "runtime::worker",
                    intent = intent.label(),
                    phase = error.phase().map(|phase| phase.as_str()),
                    code = error.error_code(),
                    error = %error,
                    "Intent rejected"
                );
            }
            Some(TransitionPhase::PostValidate) | None => {
                if matches!(error, ExecuteError::Frozen { .. }) {
                    debug!(
                        target: "runtime::worker",
                        intent = intent.label(),
                        "Intent rejected after the run ended"
                    );
                } else {
                    error!(
                        target: "runtime::worker",
                        intent = intent.label(),
                        code = error.error_code(),
                        error = %error,
                        "Intent execution failed"
                    );
                }
            }
        }

        self.event_bus
            .publish(Event::GameState(GameStateEvent::IntentRejected {
                intent: intent.clone(),
                phase: error.phase(),
                code: error.error_code().to_string(),
                error: error.to_string(),
            }));
    }
}
