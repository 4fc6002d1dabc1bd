//! Remote collaborator clients
//!
//! Each collaborator is a trait (so tests can substitute doubles) plus one
//! reqwest-backed production implementation:
//! - `CompletionService`: agent server message route
//! - `SpeechSynthesizer`: text-to-speech returning raw PCM16
//! - `Transcriber`: whisper route accepting a recorded `audio.wav`

mod completion;
mod synthesis;
mod transcription;

pub use completion::{AgentCompletionClient, CompletionReply, CompletionRequest, CompletionService};
pub use synthesis::{ElevenLabsSynthesizer, SpeechSynthesizer};
pub use transcription::{Transcriber, WhisperTranscriptionClient};
