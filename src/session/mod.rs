//! Session orchestration core
//!
//! This module provides the components that sequence one avatar session:
//! - `SessionContext`: durable room/user identity
//! - `SessionStatus`: observable busy flag and error slot
//! - `ConnectionController`: avatar engine lifecycle state machine
//! - `RequestPipeline`: completion -> synthesis -> framed audio delivery
//! - `CaptureSession`: microphone recording and transcription handoff

mod capture;
mod connection;
mod context;
mod pipeline;
mod status;

pub use capture::{CaptureSession, CaptureState, MIC_DENIED_MESSAGE};
pub use connection::{ConnectionController, ConnectionState, CONNECT_FAILED_MESSAGE};
pub use context::SessionContext;
pub use pipeline::{RequestPipeline, EMPTY_RESPONSE_MESSAGE, GENERIC_ERROR_MESSAGE};
pub use status::SessionStatus;
