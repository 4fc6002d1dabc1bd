//! Fixed-size framing of synthesized audio buffers.
//!
//! The avatar engine consumes PCM16 audio in bounded frames. This module is
//! the pure transform that splits one synthesis result into ordered frames;
//! delivery (and supersession checks) happen in the request pipeline.

/// Frame size in bytes expected by the avatar engine's audio sink.
pub const FRAME_SIZE: usize = 6000;

/// One contiguous slice of a synthesized-audio buffer.
///
/// Concatenating frames in `sequence` order reconstructs the original
/// buffer exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    /// Position of this frame within the source buffer (0-indexed)
    pub sequence: u32,
    /// Raw PCM16 bytes; `FRAME_SIZE` long except possibly the last frame
    pub bytes: Vec<u8>,
}

/// Split a byte buffer into ordered frames of at most `frame_size` bytes.
///
/// Every frame except possibly the last has exactly `frame_size` bytes; the
/// last carries the remainder. An empty buffer yields no frames.
pub fn chunk_buffer(buffer: &[u8], frame_size: usize) -> Vec<AudioFrame> {
    buffer
        .chunks(frame_size)
        .enumerate()
        .map(|(i, chunk)| AudioFrame {
            sequence: i as u32,
            bytes: chunk.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_produces_no_frames() {
        let frames = chunk_buffer(&[], FRAME_SIZE);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_buffer_smaller_than_frame_size() {
        let buffer = vec![7u8; 100];
        let frames = chunk_buffer(&buffer, FRAME_SIZE);

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].sequence, 0);
        assert_eq!(frames[0].bytes, buffer);
    }

    #[test]
    fn test_13000_bytes_splits_into_three_frames() {
        let buffer = vec![1u8; 13_000];
        let frames = chunk_buffer(&buffer, FRAME_SIZE);

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].bytes.len(), 6000);
        assert_eq!(frames[1].bytes.len(), 6000);
        assert_eq!(frames[2].bytes.len(), 1000);
        assert_eq!(frames[0].sequence, 0);
        assert_eq!(frames[1].sequence, 1);
        assert_eq!(frames[2].sequence, 2);
    }

    #[test]
    fn test_exact_multiple_has_full_last_frame() {
        let buffer = vec![2u8; FRAME_SIZE * 2];
        let frames = chunk_buffer(&buffer, FRAME_SIZE);

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].bytes.len(), FRAME_SIZE);
    }

    #[test]
    fn test_concatenation_round_trips() {
        // Patterned buffer so reordering or truncation would be caught
        let buffer: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        let frames = chunk_buffer(&buffer, FRAME_SIZE);

        let rebuilt: Vec<u8> = frames.iter().flat_map(|f| f.bytes.clone()).collect();
        assert_eq!(rebuilt, buffer);
    }

    #[test]
    fn test_frame_count_is_ceiling_of_length_over_frame_size() {
        for len in [1usize, 5_999, 6_000, 6_001, 17_999, 18_000] {
            let buffer = vec![0u8; len];
            let frames = chunk_buffer(&buffer, FRAME_SIZE);
            let expected = len.div_ceil(FRAME_SIZE);
            assert_eq!(frames.len(), expected, "len={}", len);
        }
    }
}
