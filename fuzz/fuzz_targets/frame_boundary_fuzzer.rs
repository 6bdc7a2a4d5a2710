//! Fuzz target for frame header boundary conditions.
//!
//! # Strategy
//!
//! - Magic bytes: standard, keepalive, off-by-one, all-zeros, all-ones, random
//! - Size: zero, smaller than the header itself, at-header-size, at `u32::MAX`
//! - Segment count, compressed flag, decompressed length: boundary values
//!
//! # Invariants
//!
//! - A buffer shorter than [`FrameHeader::SIZE`] MUST return
//!   `ProtoError::HeaderTooShort`, never panic.
//! - `is_magical` MUST only ever return true for the two known magic values.
//! - Parsing never panics regardless of byte content.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wiresniff_proto::{FrameHeader, KEEPALIVE_MAGIC, STANDARD_MAGIC, is_magical};

#[derive(Debug, Clone, Arbitrary)]
struct BoundaryFrame {
    magic: MagicBytes,
    size: SizeValue,
    segment_count: u16,
    compressed: bool,
    decompressed_length: u32,
    trailing_garbage: Vec<u8>,
}

#[derive(Debug, Clone, Arbitrary)]
enum MagicBytes {
    Standard,
    Keepalive,
    OffByOne(u8),
    AllZeros,
    AllOnes,
    Random([u8; 16]),
}

#[derive(Debug, Clone, Arbitrary)]
enum SizeValue {
    Zero,
    SmallerThanHeader(u8),
    ExactlyHeader,
    Small(u16),
    MaxU32,
    Random(u32),
}

fuzz_target!(|boundary: BoundaryFrame| {
    let mut bytes = vec![0u8; FrameHeader::SIZE];

    match boundary.magic {
        MagicBytes::Standard => bytes[0..16].copy_from_slice(&STANDARD_MAGIC),
        MagicBytes::Keepalive => bytes[0..16].copy_from_slice(&KEEPALIVE_MAGIC),
        MagicBytes::OffByOne(offset) => {
            bytes[0..16].copy_from_slice(&STANDARD_MAGIC);
            let idx = (offset % 16) as usize;
            bytes[idx] = bytes[idx].wrapping_add(1);
        },
        MagicBytes::AllZeros => bytes[0..16].fill(0),
        MagicBytes::AllOnes => bytes[0..16].fill(0xFF),
        MagicBytes::Random(random) => bytes[0..16].copy_from_slice(&random),
    }

    let size_value = match boundary.size {
        SizeValue::Zero => 0,
        SizeValue::SmallerThanHeader(s) => u32::from(s) % (FrameHeader::SIZE as u32),
        SizeValue::ExactlyHeader => FrameHeader::SIZE as u32,
        SizeValue::Small(s) => u32::from(s),
        SizeValue::MaxU32 => u32::MAX,
        SizeValue::Random(r) => r,
    };
    bytes[24..28].copy_from_slice(&size_value.to_le_bytes());
    bytes[30..32].copy_from_slice(&boundary.segment_count.to_le_bytes());
    bytes[33] = u8::from(boundary.compressed);
    bytes[36..40].copy_from_slice(&boundary.decompressed_length.to_le_bytes());

    bytes.extend_from_slice(&boundary.trailing_garbage);

    match FrameHeader::parse(&bytes) {
        Ok(header) => {
            assert_eq!(header.size(), size_value);
            assert_eq!(header.segment_count(), boundary.segment_count);
            assert_eq!(header.is_compressed(), boundary.compressed);
            assert_eq!(header.decompressed_length(), boundary.decompressed_length);

            let magical = is_magical(&header);
            let magic = header.magic();
            assert_eq!(magical, magic == STANDARD_MAGIC || magic == KEEPALIVE_MAGIC);
        },
        Err(_) => {
            assert!(bytes.len() < FrameHeader::SIZE, "parse only fails on a short buffer");
        },
    }
});
