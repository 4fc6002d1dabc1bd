use super::status::SessionStatus;
use crate::audio::FRAME_SIZE;
use crate::engine::{AvatarEngine, EngineEvent};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Delay before the warm-up silence frame is sent after `start()`.
const WARMUP_DELAY: Duration = Duration::from_millis(4000);

/// Error shown when the engine cannot establish a connection.
pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect to the avatar. Please try again.";

/// Avatar engine connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Connected,
    Failed,
    Closed,
}

/// Owns the avatar engine's connection lifecycle.
///
/// The controller is the only component allowed to call the engine's
/// `start`/`close`; everyone else observes `ConnectionState` through the
/// watch channel. Engine lifecycle events are consumed by a background task
/// whose handle (together with the warm-up timer) is released on `close()`
/// and, as a backstop, on drop.
pub struct ConnectionController {
    engine: Arc<dyn AvatarEngine>,
    status: SessionStatus,
    state: watch::Sender<ConnectionState>,
    event_task: Mutex<Option<JoinHandle<()>>>,
    // Shared with the event task so a `Failed` event can cancel the warm-up
    warmup_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ConnectionController {
    pub fn new(engine: Arc<dyn AvatarEngine>, status: SessionStatus) -> Self {
        let (state, _) = watch::channel(ConnectionState::Idle);

        Self {
            engine,
            status,
            state,
            event_task: Mutex::new(None),
            warmup_task: Arc::new(Mutex::new(None)),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Read-only view of the connection state.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Begin connecting. Valid only from `Idle`; any other state is a
    /// logged no-op.
    ///
    /// Schedules a one-shot warm-up frame (`FRAME_SIZE` zero bytes) sent
    /// after a fixed delay to prime the engine's audio path before real
    /// speech arrives.
    pub async fn start(&self) {
        let current = *self.state.borrow();
        if current != ConnectionState::Idle {
            warn!(state = ?current, "Ignoring start outside Idle");
            return;
        }

        info!("Connecting to avatar engine");
        self.state.send_replace(ConnectionState::Connecting);
        self.status.set_busy(true);

        // Subscribe before start so no lifecycle event is missed
        let events = self.engine.subscribe();
        let task = self.spawn_event_task(events);
        *self.event_task.lock().unwrap() = Some(task);

        if let Err(err) = self.engine.start().await {
            error!(%err, "Engine start failed");
            self.state.send_replace(ConnectionState::Failed);
            self.status.set_error(CONNECT_FAILED_MESSAGE);
            self.status.set_busy(false);
            return;
        }

        let engine = Arc::clone(&self.engine);
        let warmup = tokio::spawn(async move {
            tokio::time::sleep(WARMUP_DELAY).await;
            debug!(bytes = FRAME_SIZE, "Sending warm-up silence frame");
            let silence = vec![0u8; FRAME_SIZE];
            engine.send_audio(&silence);
        });
        *self.warmup_task.lock().unwrap() = Some(warmup);
    }

    fn spawn_event_task(&self, mut events: broadcast::Receiver<EngineEvent>) -> JoinHandle<()> {
        let state = self.state.clone();
        let status = self.status.clone();
        let warmup_task = Arc::clone(&self.warmup_task);

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(EngineEvent::Started) => {
                        info!("Avatar engine started");
                        state.send_replace(ConnectionState::Connected);
                        status.set_busy(false);
                    }
                    Ok(EngineEvent::Failed) => {
                        error!("Avatar engine reported connection failure");
                        state.send_replace(ConnectionState::Failed);
                        status.set_error(CONNECT_FAILED_MESSAGE);
                        status.set_busy(false);
                        // A failed engine must receive no further audio
                        if let Some(task) = warmup_task.lock().unwrap().take() {
                            task.abort();
                        }
                    }
                    Ok(EngineEvent::Connected) => {
                        info!("Avatar engine media channel connected");
                    }
                    Ok(EngineEvent::Disconnected) => {
                        info!("Avatar engine media channel disconnected");
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Lagged behind engine events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            debug!("Engine event task stopped");
        })
    }

    /// Tear the connection down: release the event subscription and warm-up
    /// timer, close the engine, and enter `Closed`. Safe from any state.
    pub async fn close(&self) {
        if let Some(task) = self.warmup_task.lock().unwrap().take() {
            task.abort();
        }
        if let Some(task) = self.event_task.lock().unwrap().take() {
            task.abort();
        }

        self.engine.close().await;
        self.state.send_replace(ConnectionState::Closed);
        self.status.set_busy(false);

        info!("Avatar connection closed");
    }
}

impl Drop for ConnectionController {
    fn drop(&mut self) {
        // Backstop for exit paths that never reached close()
        if let Some(task) = self.warmup_task.lock().unwrap().take() {
            task.abort();
        }
        if let Some(task) = self.event_task.lock().unwrap().take() {
            task.abort();
        }
    }
}
