//! Fuzz target for the reassembler's handling of arbitrarily-chunked byte
//! streams.
//!
//! Feeds a well-formed stream of keepalive frames into a
//! [`wiresniff_core::QueueBuffer`] split at arbitrary points, interleaved
//! with chunks of pure noise, and checks that draining never panics and
//! never yields more frames than were actually pushed.
//!
//! # Invariants
//!
//! - `drain_frames` never panics regardless of how the stream is chunked.
//! - The buffer never reports more bytes than have been pushed and not yet
//!   drained.
//! - Noise that doesn't happen to start with a magical header is never
//!   consumed as a frame.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wiresniff_core::{QueueBuffer, drain_frames};
use wiresniff_proto::{FrameHeader, STANDARD_MAGIC};

#[derive(Debug, Clone, Arbitrary)]
enum Chunk {
    /// The next `u8 % remaining` bytes of the frame currently being fed in.
    FramePiece(u8),
    /// Arbitrary noise bytes, never magical by construction.
    Noise(Vec<u8>),
}

fn keepalive_frame_bytes() -> Vec<u8> {
    let mut bytes = vec![0u8; FrameHeader::SIZE];
    bytes[0..16].copy_from_slice(&STANDARD_MAGIC);
    bytes[24..28].copy_from_slice(&(FrameHeader::SIZE as u32).to_le_bytes());
    bytes
}

fuzz_target!(|chunks: Vec<Chunk>| {
    let mut buffer = QueueBuffer::new();
    let mut frames_completed = 0usize;
    let frame = keepalive_frame_bytes();
    // How much of the *next* frame has already been queued up; once this
    // reaches `frame.len()` the next piece starts a fresh frame.
    let mut fed = 0usize;

    for chunk in chunks {
        let piece: Vec<u8> = match chunk {
            Chunk::FramePiece(split) => {
                let remaining = frame.len() - fed;
                let take = 1 + (split as usize % remaining);
                let piece = frame[fed..fed + take].to_vec();
                fed += take;
                if fed == frame.len() {
                    frames_completed += 1;
                    fed = 0;
                }
                piece
            },
            Chunk::Noise(bytes) => {
                // Never allow noise to accidentally reconstruct the magic
                // prefix; that would make the frame count assertion flaky.
                let mut bytes = bytes;
                if bytes.len() >= 16 && bytes[0..16] == STANDARD_MAGIC {
                    bytes[0] ^= 0xFF;
                }
                bytes
            },
        };

        if buffer.push(&piece).is_err() {
            // Buffer is at capacity; draining can't make progress on this
            // push, so just stop feeding more input this run.
            break;
        }

        let drained = drain_frames(&mut buffer);
        assert!(drained.len() <= frames_completed);
    }
});
