//! In-memory WAV assembly for the transcription upload.

use crate::error::Result;
use std::io::Cursor;

/// Encode raw PCM16 little-endian mono bytes into a complete WAV file held
/// in memory.
///
/// The capture session uploads the result as `audio.wav`; nothing is written
/// to disk. A trailing odd byte (half a sample) is dropped.
pub fn encode_wav(pcm_bytes: &[u8], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for sample in pcm_bytes.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([sample[0], sample[1]]))?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
