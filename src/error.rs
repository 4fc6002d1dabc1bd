//! Error types for the avatar session core

use thiserror::Error;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors that can occur while orchestrating an avatar session
#[derive(Error, Debug)]
pub enum SessionError {
    /// A newer submission took over; results of the old one must be dropped.
    /// Expected during normal operation and never shown to the user.
    #[error("Request superseded by a newer submission")]
    Superseded,

    #[error("Completion returned no usable text")]
    EmptyResponse,

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Microphone denied or unavailable: {0}")]
    MicrophonePermission(String),

    #[error("Avatar engine connection failed: {0}")]
    AvatarConnection(String),

    #[error("Audio encoding error: {0}")]
    AudioEncoding(String),
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::Transport(err.to_string())
    }
}

impl From<hound::Error> for SessionError {
    fn from(err: hound::Error) -> Self {
        SessionError::AudioEncoding(err.to_string())
    }
}
