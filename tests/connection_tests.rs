// Integration tests for the connection controller
//
// These tests verify the lifecycle state machine, the start guard, the
// warm-up silence frame, and teardown, against a scriptable engine double.

use async_trait::async_trait;
use simli_session::error::{Result, SessionError};
use simli_session::session::CONNECT_FAILED_MESSAGE;
use simli_session::{
    AvatarEngine, ConnectionController, ConnectionState, EngineEvent, SessionStatus, FRAME_SIZE,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

/// Engine double whose lifecycle events are fired by the test.
struct ScriptedEngine {
    events: broadcast::Sender<EngineEvent>,
    start_calls: AtomicUsize,
    closed: AtomicBool,
    fail_start: bool,
    frames: Mutex<Vec<Vec<u8>>>,
}

impl ScriptedEngine {
    fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            events,
            start_calls: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            fail_start: false,
            frames: Mutex::new(Vec::new()),
        }
    }

    fn failing_start() -> Self {
        Self {
            fail_start: true,
            ..Self::new()
        }
    }

    fn fire(&self, event: EngineEvent) {
        let _ = self.events.send(event);
    }

    fn frames(&self) -> Vec<Vec<u8>> {
        self.frames.lock().unwrap().clone()
    }
}

#[async_trait]
impl AvatarEngine for ScriptedEngine {
    async fn start(&self) -> Result<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            return Err(SessionError::AvatarConnection(
                "offer rejected".to_string(),
            ));
        }
        Ok(())
    }

    fn send_audio(&self, bytes: &[u8]) {
        self.frames.lock().unwrap().push(bytes.to_vec());
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }
}

/// Let spawned controller tasks run under the paused clock.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

async fn wait_for_state(controller: &ConnectionController, wanted: ConnectionState) {
    let mut state = controller.watch_state();
    tokio::time::timeout(
        Duration::from_secs(5),
        state.wait_for(|s| *s == wanted),
    )
    .await
    .expect("timed out waiting for state")
    .expect("state channel closed");
}

#[tokio::test(start_paused = true)]
async fn test_start_transitions_through_connecting_to_connected() {
    let engine = Arc::new(ScriptedEngine::new());
    let status = SessionStatus::new();
    let controller = ConnectionController::new(engine.clone(), status.clone());

    assert_eq!(controller.state(), ConnectionState::Idle);

    controller.start().await;
    assert_eq!(controller.state(), ConnectionState::Connecting);
    assert!(status.is_busy());

    engine.fire(EngineEvent::Started);
    wait_for_state(&controller, ConnectionState::Connected).await;
    assert!(!status.is_busy());
    assert!(status.error().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_engine_failure_sets_failed_state_and_suppresses_warmup() {
    let engine = Arc::new(ScriptedEngine::new());
    let status = SessionStatus::new();
    let controller = ConnectionController::new(engine.clone(), status.clone());

    controller.start().await;

    // Engine reports failure 2s in, before the warm-up frame is due
    tokio::time::sleep(Duration::from_millis(2000)).await;
    engine.fire(EngineEvent::Failed);
    wait_for_state(&controller, ConnectionState::Failed).await;

    assert_eq!(status.error().as_deref(), Some(CONNECT_FAILED_MESSAGE));
    assert!(!status.is_busy());

    // Even past the warm-up delay, a failed engine receives no audio
    tokio::time::sleep(Duration::from_millis(5000)).await;
    settle().await;
    assert!(engine.frames().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_warmup_silence_frame_is_sent_after_delay() {
    let engine = Arc::new(ScriptedEngine::new());
    let status = SessionStatus::new();
    let controller = ConnectionController::new(engine.clone(), status.clone());

    controller.start().await;
    engine.fire(EngineEvent::Started);

    tokio::time::sleep(Duration::from_millis(4100)).await;
    settle().await;

    let frames = engine.frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].len(), FRAME_SIZE);
    assert!(frames[0].iter().all(|&b| b == 0), "warm-up frame is silence");
}

#[tokio::test(start_paused = true)]
async fn test_start_outside_idle_is_a_noop() {
    let engine = Arc::new(ScriptedEngine::new());
    let status = SessionStatus::new();
    let controller = ConnectionController::new(engine.clone(), status.clone());

    controller.start().await;
    controller.start().await;

    assert_eq!(engine.start_calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.state(), ConnectionState::Connecting);
}

#[tokio::test(start_paused = true)]
async fn test_failed_engine_start_reports_error() {
    let engine = Arc::new(ScriptedEngine::failing_start());
    let status = SessionStatus::new();
    let controller = ConnectionController::new(engine.clone(), status.clone());

    controller.start().await;

    assert_eq!(controller.state(), ConnectionState::Failed);
    assert_eq!(status.error().as_deref(), Some(CONNECT_FAILED_MESSAGE));
    assert!(!status.is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_close_releases_engine_from_any_state() {
    let engine = Arc::new(ScriptedEngine::new());
    let status = SessionStatus::new();
    let controller = ConnectionController::new(engine.clone(), status.clone());

    controller.start().await;
    controller.close().await;

    assert_eq!(controller.state(), ConnectionState::Closed);
    assert!(engine.closed.load(Ordering::SeqCst));

    // Warm-up timer was released with the connection
    tokio::time::sleep(Duration::from_millis(5000)).await;
    settle().await;
    assert!(engine.frames().is_empty());

    // Closing an already-closed controller stays safe
    controller.close().await;
    assert_eq!(controller.state(), ConnectionState::Closed);
}
