pub mod chunk;
pub mod microphone;
pub mod wav;

pub use chunk::{chunk_buffer, AudioFrame, FRAME_SIZE};
pub use microphone::MicrophoneSource;
pub use wav::encode_wav;
