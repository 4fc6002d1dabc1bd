use super::context::SessionContext;
use super::status::SessionStatus;
use crate::audio::{chunk_buffer, FRAME_SIZE};
use crate::clients::{CompletionRequest, CompletionService, SpeechSynthesizer};
use crate::engine::AvatarEngine;
use crate::error::{Result, SessionError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// User name attached to every completion request.
const USER_NAME: &str = "User";

/// Error shown when the agent replied with no usable text.
pub const EMPTY_RESPONSE_MESSAGE: &str = "No response from the agent. Please try again.";

/// Error shown for any other submission failure.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Converts text input into streamed audio on the avatar engine.
///
/// Exactly one submission is active at a time. Each `submit` bumps a
/// monotonically increasing generation counter; results belonging to an
/// older generation are dropped at every apply point, including before each
/// individual frame push. This is deliberately stronger than aborting the
/// transport: a stale network response that still arrives is received and
/// discarded, never applied.
pub struct RequestPipeline {
    completion: Arc<dyn CompletionService>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    sink: Arc<dyn AvatarEngine>,
    context: SessionContext,
    status: SessionStatus,
    generation: AtomicU64,
}

impl RequestPipeline {
    pub fn new(
        completion: Arc<dyn CompletionService>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        sink: Arc<dyn AvatarEngine>,
        context: SessionContext,
        status: SessionStatus,
    ) -> Self {
        Self {
            completion,
            synthesizer,
            sink,
            context,
            status,
            generation: AtomicU64::new(0),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Submit user input: completion, then synthesis, then framed delivery
    /// to the engine's audio sink.
    ///
    /// Empty input (after trimming) is rejected before any network call. A
    /// submission while another is in flight supersedes it. All failures are
    /// reported through the session status slot; supersession stays silent.
    pub async fn submit(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring empty submission");
            return;
        }

        // Taking over the counter invalidates any in-flight submission
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.status.clear_error();
        self.status.set_busy(true);
        debug!(generation, "Submitting input");

        let mut outcome = self.run(generation, text).await;
        if !self.is_current(generation) {
            // A newer submission owns the status slots now; report nothing
            outcome = Err(SessionError::Superseded);
        }

        match outcome {
            Ok(frames) => {
                info!(generation, frames, "Reply delivered to avatar");
                self.status.set_busy(false);
            }
            Err(SessionError::Superseded) => {
                debug!(generation, "Submission superseded, results dropped");
            }
            Err(SessionError::EmptyResponse) => {
                warn!(generation, "Completion returned no usable text");
                self.status.set_error(EMPTY_RESPONSE_MESSAGE);
                self.status.set_busy(false);
            }
            Err(err) => {
                warn!(generation, %err, "Submission failed");
                self.status.set_error(GENERIC_ERROR_MESSAGE);
                self.status.set_busy(false);
            }
        }
    }

    async fn run(&self, generation: u64, text: &str) -> Result<usize> {
        let request = CompletionRequest {
            text: text.to_string(),
            room_id: self.context.room_id.clone(),
            user_id: self.context.user_id.clone(),
            user_name: USER_NAME.to_string(),
        };

        let replies = self.completion.complete(&request).await?;
        if !self.is_current(generation) {
            return Err(SessionError::Superseded);
        }

        let reply_text = replies.first().map(|r| r.text.trim()).unwrap_or_default();
        if reply_text.is_empty() {
            // No synthesis call on an empty reply
            return Err(SessionError::EmptyResponse);
        }

        let audio = self.synthesizer.synthesize(reply_text).await?;
        if !self.is_current(generation) {
            return Err(SessionError::Superseded);
        }

        let frames = chunk_buffer(&audio, FRAME_SIZE);
        let count = frames.len();
        for frame in &frames {
            // Re-checked per frame: a submission arriving mid-delivery
            // must stop stale frames from reaching the sink
            if !self.is_current(generation) {
                return Err(SessionError::Superseded);
            }
            self.sink.send_audio(&frame.bytes);
        }

        Ok(count)
    }
}
