//! Wire format for the sniffed protocol.
//!
//! This crate only knows about bytes: fixed-width headers, the magic test
//! that tells a frame boundary from garbage, and the forward-only reader
//! decoders use to pull fields out of an IPC body. It has no notion of
//! sockets, queues, or events — those live in `wiresniff-core`.

pub mod error;
pub mod header;
pub mod reader;

pub use error::{ProtoError, Result};
pub use header::{
    Direction, FrameHeader, IpcHeader, KEEPALIVE_MAGIC, STANDARD_MAGIC, SegmentHeader, SegmentType,
    is_magical,
};
pub use reader::BufferReader;
