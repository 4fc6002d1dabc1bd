//! Microphone capture abstraction.

use crate::error::Result;
use tokio::sync::mpsc;

/// Source of raw recorder chunks for the capture session.
///
/// Implementations wrap a platform recorder (or a test double). Chunks are
/// raw PCM16 little-endian mono bytes at the session's capture sample rate,
/// delivered in arrival order.
#[async_trait::async_trait]
pub trait MicrophoneSource: Send + Sync {
    /// Acquire the microphone and start recording.
    ///
    /// Returns a channel receiver delivering recorder chunks until the
    /// source is released. Fails with `SessionError::MicrophonePermission`
    /// when the device is denied or unavailable.
    async fn acquire(&self) -> Result<mpsc::Receiver<Vec<u8>>>;

    /// Stop recording and release the device.
    ///
    /// Closes the chunk channel returned by `acquire`; releasing an idle
    /// source is a no-op.
    async fn release(&self);
}
