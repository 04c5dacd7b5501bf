//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers one async method per
//! player intent, plus snapshots and topic subscriptions for the
//! presentation layer.
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{broadcast, mpsc, oneshot};

use annex_core::action::{
    AcceptTrapAction, CloseEmailAction, CompleteIntroAction, CompleteLunchAction,
    DismissStickyNoteAction, EnqueueLogAction, RejectTrapAction, ResetGameAction,
    ReviewDecisionAction, SignAmendmentAction, StartShiftAction, TogglePauseAction,
    VetoAmendmentAction,
};
use annex_core::env::StickyNote;
use annex_core::{
    ActionExtra, ExecutionOutcome, GameState, Intent, LogItem, PerformAction, PlayerAction,
    PlayerIntent, SpawnPlan, SystemIntent,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Everything the presentation layer renders in one frame.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub state: GameState,
    /// Log currently on the terminal.
    pub current_log: Option<LogItem>,
    /// True while a player intent is between dispatch and resolution.
    pub is_processing: bool,
    /// Sticky note currently pinned to the terminal.
    pub sticky_note: Option<StickyNote>,
}

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    in_flight: Arc<AtomicUsize>,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn complete_intro(&self) -> Result<ExecutionOutcome> {
        self.player(PlayerIntent::CompleteIntro(CompleteIntroAction))
            .await
    }

    pub async fn start_shift(&self) -> Result<ExecutionOutcome> {
        self.player(PlayerIntent::StartShift(StartShiftAction)).await
    }

    /// Triage the log on the terminal.
    pub async fn perform_action(
        &self,
        action: PlayerAction,
        extra: Option<ActionExtra>,
    ) -> Result<ExecutionOutcome> {
        let mut perform = PerformAction::new(action);
        if let Some(extra) = extra {
            perform = perform.with_extra(extra);
        }
        self.player(PlayerIntent::Perform(perform)).await
    }

    pub async fn accept_trap(&self) -> Result<ExecutionOutcome> {
        self.player(PlayerIntent::AcceptTrap(AcceptTrapAction)).await
    }

    pub async fn reject_trap(&self) -> Result<ExecutionOutcome> {
        self.player(PlayerIntent::RejectTrap(RejectTrapAction)).await
    }

    pub async fn sign_amendment(&self) -> Result<ExecutionOutcome> {
        self.player(PlayerIntent::SignAmendment(SignAmendmentAction))
            .await
    }

    pub async fn veto_amendment(&self) -> Result<ExecutionOutcome> {
        self.player(PlayerIntent::VetoAmendment(VetoAmendmentAction))
            .await
    }

    pub async fn complete_lunch(&self, choice: usize) -> Result<ExecutionOutcome> {
        self.player(PlayerIntent::CompleteLunch(CompleteLunchAction::new(choice)))
            .await
    }

    pub async fn close_email(&self, option: Option<usize>) -> Result<ExecutionOutcome> {
        self.player(PlayerIntent::CloseEmail(CloseEmailAction::new(option)))
            .await
    }

    pub async fn make_review_decision(&self, option: usize) -> Result<ExecutionOutcome> {
        self.player(PlayerIntent::MakeReviewDecision(ReviewDecisionAction::new(
            option,
        )))
        .await
    }

    pub async fn toggle_pause(&self) -> Result<ExecutionOutcome> {
        self.player(PlayerIntent::TogglePause(TogglePauseAction)).await
    }

    /// Starts a fresh run. The persistence worker clears the saved one.
    pub async fn reset_game(&self) -> Result<ExecutionOutcome> {
        self.player(PlayerIntent::ResetGame(ResetGameAction)).await
    }

    pub async fn dismiss_sticky_note(&self, id: impl Into<String>) -> Result<ExecutionOutcome> {
        self.player(PlayerIntent::DismissStickyNote(DismissStickyNoteAction::new(
            id,
        )))
        .await
    }

    /// Advances the game clock. The scheduler worker calls this on a timer;
    /// tests call it directly.
    pub async fn tick(&self, elapsed_ms: u64) -> Result<ExecutionOutcome> {
        self.execute(Intent::tick(elapsed_ms)).await
    }

    /// True while any player intent is between dispatch and resolution.
    pub fn is_processing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) > 0
    }

    /// Current state plus the derived presentation values.
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        let mut snapshot = reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?;
        snapshot.is_processing = self.is_processing();
        Ok(snapshot)
    }

    /// Query the current game state (read-only snapshot)
    pub async fn query_state(&self) -> Result<GameState> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::GameState` - Applied and rejected intents
    /// - `Topic::Content` - Generated, fallback and dropped logs
    /// - `Topic::Persistence` - Saves and save failures
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub(crate) async fn plan_spawn(&self) -> Result<Option<SpawnPlan>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::PlanSpawn { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub(crate) async fn enqueue_log(&self, action: EnqueueLogAction) -> Result<ExecutionOutcome> {
        self.execute(Intent::System(SystemIntent::EnqueueLog(action)))
            .await
    }

    async fn player(&self, intent: PlayerIntent) -> Result<ExecutionOutcome> {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        let result = self.execute(Intent::Player(intent)).await;
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
        result
    }

    async fn execute(&self, intent: Intent) -> Result<ExecutionOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Execute {
                intent,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }
}
