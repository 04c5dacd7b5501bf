//! End-to-end runtime scenarios.
//!
//! The scheduler is disabled so every test drives the clock explicitly.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Notify, broadcast};
use tokio::time::{sleep, timeout};

use annex_content::ContentFactory;
use annex_core::{
    DirectorInstruction, GameState, HazardTags, LogItem, Phase, PlayerAction,
    ProviderContext,
};
use runtime::{
    ContentEvent, ContentProvider, Event, GeneratedLog, InMemoryStateRepo, OracleBundle,
    PersistenceEvent, ProviderError, Runtime, RuntimeConfig, RuntimeHandle, Snapshot,
    StateRepository, Topic,
};

const WAIT: Duration = Duration::from_secs(5);

/// Past the flavor shifts and before human logs appear, so every spawn goes
/// through the content provider.
const GENERATED_SHIFT: u32 = 4;

fn oracles() -> OracleBundle {
    let catalog = ContentFactory::bundled_catalog().expect("bundled catalog");
    let config = ContentFactory::bundled_config().expect("bundled config");
    OracleBundle::new(Arc::new(catalog), config)
}

fn test_config() -> RuntimeConfig {
    RuntimeConfig {
        enable_scheduler: false,
        seed: Some(7),
        persistence_interval: Duration::from_millis(50),
        provider_timeout: Duration::from_millis(200),
        ..RuntimeConfig::default()
    }
}

/// A run parked between shifts, past the tutorial.
fn standby_state(oracles: &OracleBundle, shift_index: u32) -> GameState {
    let mut state = GameState::new(21, oracles.config(), oracles.default_rule_ids());
    state.has_seen_intro = true;
    state.phase = Phase::Standby;
    state.shift_index = shift_index;
    state.use_provider = true;
    state
}

async fn wait_for(handle: &RuntimeHandle, predicate: impl Fn(&Snapshot) -> bool) -> Snapshot {
    timeout(WAIT, async {
        loop {
            let snapshot = handle.snapshot().await.expect("snapshot");
            if predicate(&snapshot) {
                return snapshot;
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time")
}

async fn next_content(rx: &mut broadcast::Receiver<Event>) -> ContentEvent {
    timeout(WAIT, async {
        loop {
            match rx.recv().await {
                Ok(Event::Content(event)) => return event,
                Ok(_) => {}
                Err(err) => panic!("content topic closed: {err}"),
            }
        }
    })
    .await
    .expect("no content event in time")
}

fn triage(log: &LogItem) -> PlayerAction {
    if log.tags.is_empty() {
        PlayerAction::Log
    } else {
        PlayerAction::Contain
    }
}

struct FailingProvider;

#[async_trait]
impl ContentProvider for FailingProvider {
    async fn generate(
        &self,
        _instruction: &DirectorInstruction,
        _context: &ProviderContext,
    ) -> Result<GeneratedLog, ProviderError> {
        Err(ProviderError::Unavailable("connection refused".into()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Blocks inside `generate` until released.
struct GatedProvider {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl ContentProvider for GatedProvider {
    async fn generate(
        &self,
        instruction: &DirectorInstruction,
        _context: &ProviderContext,
    ) -> Result<GeneratedLog, ProviderError> {
        self.entered.notify_one();
        self.release.notified().await;
        let log = LogItem::generated(
            instruction.target,
            "The gate held until someone remembered it.",
            HazardTags::empty(),
        );
        Ok(GeneratedLog::new(log))
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

#[tokio::test]
async fn tutorial_plays_through_to_the_next_shift() {
    let runtime = Runtime::builder()
        .config(test_config())
        .oracles(oracles())
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();

    handle.complete_intro().await.expect("intro");
    if matches!(handle.query_state().await.expect("state").phase, Phase::EmailModal { .. }) {
        handle.close_email(None).await.expect("email");
    }
    handle.start_shift().await.expect("clock in");

    for _ in 0..32 {
        let snapshot = wait_for(&handle, |s| {
            s.current_log.is_some() || !s.state.work.shift_end.is_idle()
        })
        .await;
        let Some(log) = snapshot.current_log else {
            break;
        };
        handle
            .perform_action(triage(&log), None)
            .await
            .expect("triage");
    }

    handle.tick(2_500).await.expect("grace");
    handle.tick(4_000).await.expect("finalize");

    let mut state = handle.query_state().await.expect("state");
    if matches!(state.phase, Phase::Reviewing { .. }) {
        handle.make_review_decision(0).await.expect("review");
        state = handle.query_state().await.expect("state");
    }
    assert_eq!(state.shift_index, 1);
    assert!(!state.phase.is_mid_shift());
    assert!(state.total_logs_processed >= 2);

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn rejected_intent_leaves_the_state_untouched() {
    let runtime = Runtime::builder()
        .config(test_config())
        .oracles(oracles())
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();
    let mut events = handle.subscribe(Topic::GameState);
    let before = handle.query_state().await.expect("state");

    let err = handle.start_shift().await.expect_err("intro not done");
    assert!(err.is_rejection());
    assert!(err.error_code().is_some());
    assert_eq!(handle.query_state().await.expect("state"), before);

    let event = timeout(WAIT, events.recv())
        .await
        .expect("event in time")
        .expect("event");
    assert!(matches!(
        event,
        Event::GameState(runtime::GameStateEvent::IntentRejected { .. })
    ));
    assert!(!handle.is_processing());

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn checkpoints_are_saved_and_reset_clears_them() {
    let repo = Arc::new(InMemoryStateRepo::new());
    let runtime = Runtime::builder()
        .config(test_config())
        .oracles(oracles())
        .repository(repo.clone())
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();
    let mut persistence = handle.subscribe(Topic::Persistence);

    handle.complete_intro().await.expect("intro");
    let saved = timeout(WAIT, persistence.recv())
        .await
        .expect("save in time")
        .expect("event");
    assert!(matches!(
        saved,
        Event::Persistence(PersistenceEvent::Saved { shift_index: 0, .. })
    ));
    let stored = repo.load().expect("load").expect("saved run");
    assert!(stored.has_seen_intro);

    // Mid-shift states never reach the slot.
    if matches!(handle.query_state().await.expect("state").phase, Phase::EmailModal { .. }) {
        handle.close_email(None).await.expect("email");
    }
    handle.start_shift().await.expect("clock in");
    wait_for(&handle, |s| s.current_log.is_some()).await;
    let stored = repo.load().expect("load").expect("saved run");
    assert!(!stored.phase.is_mid_shift());

    handle.reset_game().await.expect("reset");
    timeout(WAIT, async {
        while repo.exists() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("slot cleared");

    runtime.shutdown().await.expect("shutdown");
    assert!(!repo.exists(), "a fresh run is not a checkpoint");
}

#[tokio::test]
async fn saved_run_resumes_between_shifts() {
    let oracles = oracles();
    let mut saved = standby_state(&oracles, 3);
    saved.phase = Phase::ShiftActive;
    saved.meters.stress = 70;
    saved.paused = true;
    let repo = Arc::new(InMemoryStateRepo::with_state(saved));

    let runtime = Runtime::builder()
        .config(test_config())
        .oracles(oracles)
        .repository(repo)
        .build()
        .await
        .expect("runtime builds");
    let state = runtime.handle().query_state().await.expect("state");

    assert_eq!(state.shift_index, 3);
    assert_eq!(state.phase, Phase::Standby);
    assert_eq!(state.meters.stress, 0);
    assert!(!state.paused);

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn failing_provider_falls_back_to_the_static_table() {
    let oracles = oracles();
    let runtime = Runtime::builder()
        .config(test_config())
        .initial_state(standby_state(&oracles, GENERATED_SHIFT))
        .oracles(oracles)
        .provider(FailingProvider)
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();
    let mut content = handle.subscribe(Topic::Content);

    handle.start_shift().await.expect("clock in");

    match next_content(&mut content).await {
        ContentEvent::LogSpawned {
            source, fallback, ..
        } => {
            assert!(fallback);
            assert_eq!(source, "fallback");
        }
        other => panic!("expected a spawned log, got {other:?}"),
    }

    let snapshot = wait_for(&handle, |s| s.current_log.is_some()).await;
    assert_eq!(snapshot.state.stats.provider_calls, 1);
    assert_eq!(snapshot.state.stats.errors, 1);

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn slow_provider_times_out_into_the_fallback() {
    let oracles = oracles();
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            provider_timeout: Duration::from_millis(30),
            ..test_config()
        })
        .initial_state(standby_state(&oracles, GENERATED_SHIFT))
        .oracles(oracles)
        .provider(GatedProvider {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        })
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();

    handle.start_shift().await.expect("clock in");
    let snapshot = wait_for(&handle, |s| s.current_log.is_some()).await;

    assert_eq!(snapshot.state.stats.provider_calls, 1);
    assert_eq!(snapshot.state.stats.errors, 1);
    assert_eq!(snapshot.state.stats.tokens_used, 0);

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn late_spawn_is_dropped_after_the_shift_moves_on() {
    let oracles = oracles();
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            provider_timeout: Duration::from_secs(10),
            ..test_config()
        })
        .initial_state(standby_state(&oracles, GENERATED_SHIFT))
        .oracles(oracles)
        .provider(GatedProvider {
            entered: entered.clone(),
            release: release.clone(),
        })
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();
    let mut content = handle.subscribe(Topic::Content);

    handle.start_shift().await.expect("clock in");
    timeout(WAIT, entered.notified())
        .await
        .expect("provider called");

    handle.reset_game().await.expect("reset");
    release.notify_one();

    match next_content(&mut content).await {
        ContentEvent::SpawnDropped { .. } => {}
        other => panic!("expected a dropped spawn, got {other:?}"),
    }
    let state = handle.query_state().await.expect("state");
    assert_eq!(state.phase, Phase::Intro);
    assert!(state.work.queue.is_empty());

    runtime.shutdown().await.expect("shutdown");
}
