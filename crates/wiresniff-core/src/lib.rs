//! Stateful capture pipeline: per-flow reassembly, decompression, IPC
//! dispatch against a pluggable decoder table, and a typed event bus.
//!
//! This crate has no opinion on where bytes come from (that's
//! `wiresniff-capture`) or what a region's opcode catalog and decoders look
//! like (that's `wiresniff-decoders`/`wiresniff-config`); it only knows how
//! to turn `(flow, bytes)` into events once those are supplied.

pub mod error;
pub mod events;
pub mod flow;
pub mod opcodes;
pub mod processor;
pub mod queue_buffer;
pub mod reassembler;
pub mod registry;

pub use error::{DecodeError, FrameError};
pub use events::{
    DEFAULT_EVENT_CAPACITY, DiagnosticsEvent, ErrorEvent, EventBus, EventHandles, MessageEvent,
    PacketEvent, Segment, SegmentEvent,
};
pub use flow::FlowTable;
pub use opcodes::{OpcodeIndex, UNKNOWN_NAME};
pub use processor::{Pipeline, RegionData, RegionHandle};
pub use queue_buffer::{BufferFull, QueueBuffer};
pub use reassembler::{RawFrame, drain_frames};
pub use registry::{DecodeResult, DecoderRegistry, ParsedIpc};
