//! Avatar engine abstraction.
//!
//! The real engine is an external real-time rendering collaborator (WebRTC
//! video/audio). This module defines the seam the session core talks
//! through: lifecycle operations, the audio sink, and a typed event
//! subscription. `ConnectionController` owns the lifecycle calls; the
//! request pipeline only pushes audio.

use crate::error::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Lifecycle signals emitted by the avatar engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// Media channel established
    Connected,
    /// Media channel lost
    Disconnected,
    /// Connection attempt failed
    Failed,
    /// Engine is ready to accept audio
    Started,
}

/// Configuration handed to an engine implementation at construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Engine API key
    pub api_key: String,
    /// Avatar face identifier
    pub face_id: String,
    /// Whether the engine should keep the avatar idling during silence
    pub handle_silence: bool,
}

/// Session-scoped handle to the avatar rendering engine.
///
/// `send_audio` is a synchronous, non-suspending call: the engine buffers
/// internally and no backpressure is applied toward the producer.
#[async_trait::async_trait]
pub trait AvatarEngine: Send + Sync {
    /// Begin establishing the media connection.
    async fn start(&self) -> Result<()>;

    /// Push one audio frame (raw PCM16 bytes) to the engine's audio sink.
    fn send_audio(&self, bytes: &[u8]);

    /// Tear the connection down. Safe to call in any state.
    async fn close(&self);

    /// Subscribe to lifecycle events. Dropping the receiver ends the
    /// subscription; no symmetric unsubscribe call is needed.
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent>;
}

/// Stand-in engine that logs instead of rendering.
///
/// Reports `Started` immediately after `start()` so the rest of the session
/// can be exercised without the external media stack.
pub struct LoggingEngine {
    face_id: String,
    events: broadcast::Sender<EngineEvent>,
    frames_sent: AtomicUsize,
}

impl LoggingEngine {
    pub fn new(config: EngineConfig) -> Self {
        let (events, _) = broadcast::channel(16);
        info!(face_id = %config.face_id, "Logging engine initialized (no media transport)");

        Self {
            face_id: config.face_id,
            events,
            frames_sent: AtomicUsize::new(0),
        }
    }

    /// Number of audio frames received so far.
    pub fn frames_sent(&self) -> usize {
        self.frames_sent.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AvatarEngine for LoggingEngine {
    async fn start(&self) -> Result<()> {
        info!(face_id = %self.face_id, "Logging engine started");
        // No receiver yet is fine; the controller subscribes before start
        let _ = self.events.send(EngineEvent::Started);
        Ok(())
    }

    fn send_audio(&self, bytes: &[u8]) {
        let frame = self.frames_sent.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(frame, bytes = bytes.len(), "Audio frame received");
    }

    async fn close(&self) {
        info!(
            frames = self.frames_sent.load(Ordering::SeqCst),
            "Logging engine closed"
        );
    }

    fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }
}
