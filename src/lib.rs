pub mod audio;
pub mod clients;
pub mod config;
pub mod engine;
pub mod error;
pub mod session;

pub use audio::{chunk_buffer, encode_wav, AudioFrame, MicrophoneSource, FRAME_SIZE};
pub use clients::{
    AgentCompletionClient, CompletionReply, CompletionRequest, CompletionService,
    ElevenLabsSynthesizer, SpeechSynthesizer, Transcriber, WhisperTranscriptionClient,
};
pub use config::Config;
pub use engine::{AvatarEngine, EngineConfig, EngineEvent, LoggingEngine};
pub use error::{Result, SessionError};
pub use session::{
    CaptureSession, CaptureState, ConnectionController, ConnectionState, RequestPipeline,
    SessionContext, SessionStatus,
};
