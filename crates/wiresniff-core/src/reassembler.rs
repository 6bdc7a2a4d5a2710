//! Drains complete, well-formed frames out of a flow's [`QueueBuffer`].
//!
//! Frames within one flow are handed back in wire order; across flows, the
//! caller decides ordering (there is none implied here).

use wiresniff_proto::{FrameHeader, is_magical};

use crate::queue_buffer::QueueBuffer;

/// A frame that has fully arrived, header parsed, full wire bytes retained.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Parsed frame header.
    pub header: FrameHeader,
    /// The complete frame on the wire: header followed by body.
    pub bytes: Vec<u8>,
}

impl RawFrame {
    /// The frame body, i.e. everything after the fixed header.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.bytes[FrameHeader::SIZE..]
    }
}

/// Pull every frame that has fully arrived out of `buffer`.
///
/// Implements the loop from the reassembly description: peek a candidate
/// header, bail if there isn't enough data yet, bail (without erroring) if
/// the candidate isn't magical, bail if the full frame hasn't arrived, else
/// pop and repeat. A non-magical header is treated exactly like "not enough
/// data yet" — the reassembler never scans forward for resync, relying
/// instead on the protocol's in-order TCP delivery to put a magical header
/// back at offset zero once the stream catches up.
pub fn drain_frames(buffer: &mut QueueBuffer) -> Vec<RawFrame> {
    let mut frames = Vec::new();

    loop {
        let Some(candidate) = buffer.peek(FrameHeader::SIZE) else {
            break;
        };

        let Ok(header) = FrameHeader::parse(&candidate) else {
            break;
        };

        if !is_magical(&header) {
            break;
        }

        let total_size = header.size() as usize;
        if total_size < FrameHeader::SIZE {
            // A magical header claiming a size smaller than itself can't be
            // a real frame; wait rather than risk an empty/negative pop.
            break;
        }

        if buffer.size() < total_size {
            break;
        }

        let Some(bytes) = buffer.pop(total_size) else {
            break;
        };

        frames.push(RawFrame { header, bytes });
    }

    frames
}

#[cfg(test)]
mod tests {
    use wiresniff_proto::STANDARD_MAGIC;

    use super::*;

    fn keepalive_frame_bytes() -> Vec<u8> {
        let mut bytes = vec![0u8; FrameHeader::SIZE];
        bytes[0..16].copy_from_slice(&STANDARD_MAGIC);
        bytes[24..28].copy_from_slice(&(FrameHeader::SIZE as u32).to_le_bytes());
        bytes
    }

    #[test]
    fn drains_nothing_when_buffer_is_short() {
        let mut buf = QueueBuffer::new();
        buf.push(&[0u8; 10]).unwrap();
        assert!(drain_frames(&mut buf).is_empty());
        assert_eq!(buf.size(), 10);
    }

    #[test]
    fn drains_a_single_complete_frame() {
        let mut buf = QueueBuffer::new();
        buf.push(&keepalive_frame_bytes()).unwrap();
        let frames = drain_frames(&mut buf);
        assert_eq!(frames.len(), 1);
        assert!(buf.is_empty());
    }

    #[test]
    fn waits_when_frame_is_partially_arrived() {
        let full = keepalive_frame_bytes();
        let mut buf = QueueBuffer::new();
        buf.push(&full[..FrameHeader::SIZE - 1]).unwrap();
        assert!(drain_frames(&mut buf).is_empty());
        buf.push(&full[FrameHeader::SIZE - 1..]).unwrap();
        assert_eq!(drain_frames(&mut buf).len(), 1);
    }

    #[test]
    fn two_back_to_back_frames_drain_as_two() {
        let mut buf = QueueBuffer::new();
        buf.push(&keepalive_frame_bytes()).unwrap();
        buf.push(&keepalive_frame_bytes()).unwrap();
        assert_eq!(drain_frames(&mut buf).len(), 2);
    }

    #[test]
    fn non_magical_header_is_not_consumed() {
        let mut buf = QueueBuffer::new();
        buf.push(&[0xAAu8; FrameHeader::SIZE]).unwrap();
        assert!(drain_frames(&mut buf).is_empty());
        assert_eq!(buf.size(), FrameHeader::SIZE);
    }

    #[test]
    fn arbitrary_split_point_matches_single_shot_delivery() {
        let full = keepalive_frame_bytes();
        for k in 1..full.len() {
            let mut buf = QueueBuffer::new();
            buf.push(&full[..k]).unwrap();
            assert!(drain_frames(&mut buf).is_empty());
            buf.push(&full[k..]).unwrap();
            let frames = drain_frames(&mut buf);
            assert_eq!(frames.len(), 1, "split at {k} should still yield one frame");
        }
    }
}
