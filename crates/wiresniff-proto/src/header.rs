//! Fixed-width frame, segment, and IPC headers.
//!
//! All three headers are little-endian, fixed-width records that sit at
//! offset zero of the slice handed to `parse`. They are cast directly out of
//! the wire bytes with `zerocopy` rather than read field-by-field through a
//! [`crate::BufferReader`] — the layouts are stable across the whole
//! catalog, so there is no benefit to paying a cursor's bookkeeping cost for
//! three fixed structs parsed once per frame and per segment.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::{ProtoError, Result};

/// Standard protocol magic: the 16 bytes every regular frame starts with.
pub const STANDARD_MAGIC: [u8; 16] = [
    0x52, 0x52, 0xa0, 0x41, 0xff, 0x5d, 0x46, 0xe2, 0x7f, 0x2a, 0x64, 0x4d, 0x7b, 0x99, 0xc4, 0x75,
];

/// Keepalive magic: the 16 bytes a bare keepalive frame starts with.
pub const KEEPALIVE_MAGIC: [u8; 16] = [
    0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Fixed 40-byte frame header (little-endian).
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct FrameHeader {
    magic: [u8; 16],
    timestamp_ms: [u8; 8],
    size: [u8; 4],
    connection_type: [u8; 2],
    segment_count: [u8; 2],
    _unknown1: [u8; 1],
    compressed: [u8; 1],
    _unknown2: [u8; 2],
    decompressed_length: [u8; 4],
}

impl FrameHeader {
    /// Size of the serialized header.
    pub const SIZE: usize = 40;

    /// Parse a frame header from the start of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::HeaderTooShort`] if fewer than [`Self::SIZE`]
    /// bytes are available. Does *not* validate the magic — callers that
    /// care about resync behavior use [`is_magical`] separately, since a
    /// non-magical header is not an error, just a signal to wait for more
    /// bytes (see the reassembler).
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::ref_from_prefix(bytes)
            .map(|(header, _)| *header)
            .map_err(|_| ProtoError::HeaderTooShort { expected: Self::SIZE, actual: bytes.len() })
    }

    /// Raw 16-byte magic prefix.
    #[must_use]
    pub fn magic(&self) -> [u8; 16] {
        self.magic
    }

    /// Milliseconds-since-epoch timestamp the server stamped this frame with.
    #[must_use]
    pub fn timestamp_ms(&self) -> u64 {
        u64::from_le_bytes(self.timestamp_ms)
    }

    /// Total frame size in bytes, header included.
    #[must_use]
    pub fn size(&self) -> u32 {
        u32::from_le_bytes(self.size)
    }

    /// Protocol/connection-type tag (zone, chat, lobby, ...).
    #[must_use]
    pub fn connection_type(&self) -> u16 {
        u16::from_le_bytes(self.connection_type)
    }

    /// Number of segments packed into this frame's body.
    #[must_use]
    pub fn segment_count(&self) -> u16 {
        u16::from_le_bytes(self.segment_count)
    }

    /// Whether the body is zlib-compressed.
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.compressed[0] != 0
    }

    /// Body length after decompression, as advertised by the sender.
    ///
    /// Only meaningful when [`Self::is_compressed`] is true; callers should
    /// still trust the actual inflated length over this hint.
    #[must_use]
    pub fn decompressed_length(&self) -> u32 {
        u32::from_le_bytes(self.decompressed_length)
    }
}

/// Whether `header`'s magic matches one of the two known values.
///
/// A frame with any other 16-byte prefix is not consumed from the queue
/// buffer; the reassembler treats it as "not enough data yet" rather than as
/// a parse error (see `wiresniff-core`'s reassembler).
#[must_use]
pub fn is_magical(header: &FrameHeader) -> bool {
    let magic = header.magic();
    magic == STANDARD_MAGIC || magic == KEEPALIVE_MAGIC
}

/// Segment type, as carried in [`SegmentHeader::segment_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentType {
    /// Initial session handshake segment.
    SessionInit,
    /// Client keepalive ping.
    KeepAliveRequest,
    /// Server keepalive pong.
    KeepAliveResponse,
    /// Encryption handshake segment.
    EncryptionHandshake,
    /// Inter-process-communication segment; carries an opcoded message.
    Ipc,
    /// A value not in the known set, kept so we can still account for its
    /// byte span and move past it instead of erroring.
    Unknown(u16),
}

impl SegmentType {
    #[must_use]
    fn from_u16(value: u16) -> Self {
        match value {
            1 => Self::SessionInit,
            7 => Self::KeepAliveRequest,
            8 => Self::KeepAliveResponse,
            9 => Self::EncryptionHandshake,
            3 => Self::Ipc,
            other => Self::Unknown(other),
        }
    }
}

/// Which side of the connection originated a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Sent by the client.
    Send,
    /// Sent by the server.
    Receive,
}

impl Direction {
    #[must_use]
    fn from_u8(value: u8) -> Self {
        if value == 0 { Self::Send } else { Self::Receive }
    }
}

/// Fixed 16-byte segment header (little-endian).
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct SegmentHeader {
    size: [u8; 4],
    source_actor: [u8; 4],
    target_actor: [u8; 4],
    segment_type: [u8; 2],
    direction: [u8; 1],
    _reserved: [u8; 1],
}

impl SegmentHeader {
    /// Size of the serialized header.
    pub const SIZE: usize = 16;

    /// Parse a segment header from the start of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::HeaderTooShort`] if fewer than [`Self::SIZE`]
    /// bytes remain in the frame body.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::ref_from_prefix(bytes)
            .map(|(header, _)| *header)
            .map_err(|_| ProtoError::HeaderTooShort { expected: Self::SIZE, actual: bytes.len() })
    }

    /// Total segment size in bytes, header included.
    #[must_use]
    pub fn size(&self) -> u32 {
        u32::from_le_bytes(self.size)
    }

    /// Actor id that originated the segment.
    #[must_use]
    pub fn source_actor(&self) -> u32 {
        u32::from_le_bytes(self.source_actor)
    }

    /// Actor id the segment is addressed to.
    #[must_use]
    pub fn target_actor(&self) -> u32 {
        u32::from_le_bytes(self.target_actor)
    }

    /// Decoded segment type.
    #[must_use]
    pub fn segment_type(&self) -> SegmentType {
        SegmentType::from_u16(u16::from_le_bytes(self.segment_type))
    }

    /// Which side sent the segment.
    #[must_use]
    pub fn direction(&self) -> Direction {
        Direction::from_u8(self.direction[0])
    }
}

/// Fixed 16-byte IPC header (little-endian), present only when a segment's
/// type is [`SegmentType::Ipc`].
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct IpcHeader {
    _reserved1: [u8; 2],
    ipc_type: [u8; 2],
    server_id: [u8; 2],
    _reserved2: [u8; 2],
    timestamp: [u8; 4],
    _reserved_tail: [u8; 4],
}

impl IpcHeader {
    /// Size of the serialized header.
    pub const SIZE: usize = 16;

    /// Parse an IPC header from the start of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::HeaderTooShort`] if fewer than [`Self::SIZE`]
    /// bytes remain in the segment.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::ref_from_prefix(bytes)
            .map(|(header, _)| *header)
            .map_err(|_| ProtoError::HeaderTooShort { expected: Self::SIZE, actual: bytes.len() })
    }

    /// Numeric opcode; the dispatch key for the decoder registry.
    #[must_use]
    pub fn opcode(&self) -> u16 {
        u16::from_le_bytes(self.ipc_type)
    }

    /// Server instance id the message originated from or targets.
    #[must_use]
    pub fn server_id(&self) -> u16 {
        u16::from_le_bytes(self.server_id)
    }

    /// Seconds-since-epoch timestamp stamped on the IPC message.
    #[must_use]
    pub fn timestamp(&self) -> u32 {
        u32::from_le_bytes(self.timestamp)
    }
}

// Packed fields can't be referenced directly in a derived Debug impl without
// risking an unaligned reference, so these go through the accessors instead.

impl std::fmt::Debug for FrameHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHeader")
            .field("magic", &self.magic())
            .field("timestamp_ms", &self.timestamp_ms())
            .field("size", &self.size())
            .field("connection_type", &self.connection_type())
            .field("segment_count", &self.segment_count())
            .field("is_compressed", &self.is_compressed())
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for SegmentHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentHeader")
            .field("size", &self.size())
            .field("source_actor", &self.source_actor())
            .field("target_actor", &self.target_actor())
            .field("segment_type", &self.segment_type())
            .field("direction", &self.direction())
            .finish()
    }
}

impl std::fmt::Debug for IpcHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpcHeader")
            .field("opcode", &self.opcode())
            .field("server_id", &self.server_id())
            .field("timestamp", &self.timestamp())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn frame_header_bytes(magic: [u8; 16], size: u32, segment_count: u16, compressed: bool) -> Vec<u8> {
        let mut bytes = vec![0u8; FrameHeader::SIZE];
        bytes[0..16].copy_from_slice(&magic);
        bytes[24..28].copy_from_slice(&size.to_le_bytes());
        bytes[30..32].copy_from_slice(&segment_count.to_le_bytes());
        bytes[33] = u8::from(compressed);
        bytes
    }

    #[test]
    fn frame_header_size_is_forty() {
        assert_eq!(FrameHeader::SIZE, 40);
        assert_eq!(std::mem::size_of::<FrameHeader>(), 40);
    }

    #[test]
    fn standard_magic_is_magical() {
        let bytes = frame_header_bytes(STANDARD_MAGIC, 40, 0, false);
        let header = FrameHeader::parse(&bytes).expect("parses");
        assert!(is_magical(&header));
    }

    #[test]
    fn keepalive_magic_is_magical() {
        let bytes = frame_header_bytes(KEEPALIVE_MAGIC, 40, 0, false);
        let header = FrameHeader::parse(&bytes).expect("parses");
        assert!(is_magical(&header));
    }

    #[test]
    fn garbage_magic_is_not_magical() {
        let bytes = frame_header_bytes([0xAAu8; 16], 40, 0, false);
        let header = FrameHeader::parse(&bytes).expect("parses");
        assert!(!is_magical(&header));
    }

    #[test]
    fn short_buffer_is_rejected() {
        let bytes = vec![0u8; 10];
        assert_eq!(
            FrameHeader::parse(&bytes),
            Err(ProtoError::HeaderTooShort { expected: 40, actual: 10 })
        );
    }

    #[test]
    fn segment_header_round_trip_fields() {
        let mut bytes = vec![0u8; SegmentHeader::SIZE];
        bytes[0..4].copy_from_slice(&64u32.to_le_bytes());
        bytes[4..8].copy_from_slice(&0x1111_1111u32.to_le_bytes());
        bytes[8..12].copy_from_slice(&0x2222_2222u32.to_le_bytes());
        bytes[12..14].copy_from_slice(&3u16.to_le_bytes()); // Ipc
        bytes[14] = 1; // receive

        let header = SegmentHeader::parse(&bytes).expect("parses");
        assert_eq!(header.size(), 64);
        assert_eq!(header.source_actor(), 0x1111_1111);
        assert_eq!(header.target_actor(), 0x2222_2222);
        assert_eq!(header.segment_type(), SegmentType::Ipc);
        assert_eq!(header.direction(), Direction::Receive);
    }

    #[test]
    fn ipc_header_reads_opcode() {
        let mut bytes = vec![0u8; IpcHeader::SIZE];
        bytes[2..4].copy_from_slice(&0x00F0u16.to_le_bytes());
        let header = IpcHeader::parse(&bytes).expect("parses");
        assert_eq!(header.opcode(), 0x00F0);
    }

    proptest! {
        #[test]
        fn frame_header_size_round_trips(size in any::<u32>(), segment_count in any::<u16>()) {
            let bytes = frame_header_bytes(STANDARD_MAGIC, size, segment_count, false);
            let header = FrameHeader::parse(&bytes).expect("parses");
            prop_assert_eq!(header.size(), size);
            prop_assert_eq!(header.segment_count(), segment_count);
        }
    }
}
