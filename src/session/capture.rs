use super::pipeline::{RequestPipeline, GENERIC_ERROR_MESSAGE};
use super::status::SessionStatus;
use crate::audio::{encode_wav, MicrophoneSource};
use crate::clients::Transcriber;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Error shown when the microphone cannot be acquired.
pub const MIC_DENIED_MESSAGE: &str = "Microphone unavailable. Check permissions and try again.";

/// Capture sub-session lifecycle; transitions are user-toggle-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Recording,
}

/// User-toggled microphone recording session.
///
/// While recording, a drain task appends raw recorder chunks to the capture
/// buffer in arrival order. The stop transition is the single authoritative
/// finalize trigger: it joins the drain task, assembles the buffer into one
/// WAV object, clears the buffer, and hands the recording to transcription
/// exactly once. The transcript is then submitted to the request pipeline
/// as if the user had typed it.
pub struct CaptureSession {
    microphone: Arc<dyn MicrophoneSource>,
    transcriber: Arc<dyn Transcriber>,
    pipeline: Arc<RequestPipeline>,
    status: SessionStatus,
    sample_rate: u32,
    state: watch::Sender<CaptureState>,
    buffer: Arc<Mutex<Vec<Vec<u8>>>>,
    drain_task: Mutex<Option<JoinHandle<()>>>,
}

impl CaptureSession {
    pub fn new(
        microphone: Arc<dyn MicrophoneSource>,
        transcriber: Arc<dyn Transcriber>,
        pipeline: Arc<RequestPipeline>,
        status: SessionStatus,
        sample_rate: u32,
    ) -> Self {
        let (state, _) = watch::channel(CaptureState::Idle);

        Self {
            microphone,
            transcriber,
            pipeline,
            status,
            sample_rate,
            state,
            buffer: Arc::new(Mutex::new(Vec::new())),
            drain_task: Mutex::new(None),
        }
    }

    pub fn state(&self) -> CaptureState {
        *self.state.borrow()
    }

    /// Read-only view of the capture state.
    pub fn watch_state(&self) -> watch::Receiver<CaptureState> {
        self.state.subscribe()
    }

    /// Flip between `Idle` and `Recording`.
    pub async fn toggle(&self) {
        let state = *self.state.borrow();
        match state {
            CaptureState::Idle => self.begin().await,
            CaptureState::Recording => self.stop().await,
        }
    }

    async fn begin(&self) {
        self.status.clear_error();

        let mut chunks = match self.microphone.acquire().await {
            Ok(rx) => rx,
            Err(err) => {
                warn!(%err, "Microphone acquisition failed");
                self.status.set_error(MIC_DENIED_MESSAGE);
                return;
            }
        };

        self.state.send_replace(CaptureState::Recording);
        info!("Recording started");

        // Drain task only accumulates; it exits when the source closes the
        // channel and never finalizes the recording itself
        let buffer = Arc::clone(&self.buffer);
        let task = tokio::spawn(async move {
            while let Some(chunk) = chunks.recv().await {
                buffer.lock().await.push(chunk);
            }
            debug!("Recorder chunk stream ended");
        });
        *self.drain_task.lock().await = Some(task);
    }

    /// Stop recording and finalize. A stop while already `Idle` is a no-op
    /// and triggers no transcription.
    pub async fn stop(&self) {
        if *self.state.borrow() != CaptureState::Recording {
            debug!("Ignoring stop while idle");
            return;
        }

        self.state.send_replace(CaptureState::Idle);
        self.microphone.release().await;

        // Join the drain task so the buffer is complete before assembly
        if let Some(task) = self.drain_task.lock().await.take() {
            if let Err(err) = task.await {
                error!(%err, "Capture drain task panicked");
            }
        }

        info!("Recording stopped");
        self.finalize().await;
    }

    async fn finalize(&self) {
        let chunks = {
            let mut buffer = self.buffer.lock().await;
            std::mem::take(&mut *buffer)
        };

        if chunks.is_empty() {
            warn!("Recording produced no audio, skipping transcription");
            return;
        }

        let pcm = chunks.concat();
        let wav = match encode_wav(&pcm, self.sample_rate) {
            Ok(wav) => wav,
            Err(err) => {
                error!(%err, "Failed to assemble recording");
                self.status.set_error(GENERIC_ERROR_MESSAGE);
                return;
            }
        };

        info!(bytes = wav.len(), "Forwarding recording to transcription");
        match self.transcriber.transcribe(wav).await {
            Ok(text) => {
                debug!(chars = text.len(), "Transcript received");
                self.pipeline.submit(&text).await;
            }
            Err(err) => {
                warn!(%err, "Transcription failed");
                self.status.set_error(GENERIC_ERROR_MESSAGE);
            }
        }
    }
}
