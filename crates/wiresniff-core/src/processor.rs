//! The frame processor: the piece that turns raw flow bytes into events.
//!
//! [`Pipeline::handle_payload`] is the single entry point a capture driver
//! calls for every TCP payload chunk it observes. Everything else in this
//! crate exists to be composed here: [`crate::flow::FlowTable`] absorbs
//! segmentation, [`crate::reassembler::drain_frames`] turns buffered bytes
//! into complete frames, and this module decompresses each frame, walks its
//! segments, dispatches IPC bodies through the [`crate::registry::DecoderRegistry`],
//! and emits everything on the [`crate::events::EventBus`].

use std::{
    io::Read,
    net::SocketAddr,
    sync::Arc,
    time::Instant,
};

use arc_swap::ArcSwap;
use bytes::Bytes;
use flate2::read::ZlibDecoder;
use wiresniff_proto::{BufferReader, IpcHeader, SegmentHeader, SegmentType};

use crate::{
    error::FrameError,
    events::{DiagnosticsEvent, ErrorEvent, EventBus, MessageEvent, PacketEvent, Segment, SegmentEvent},
    flow::FlowTable,
    opcodes::OpcodeIndex,
    reassembler::{RawFrame, drain_frames},
    registry::DecoderRegistry,
};

/// Everything that changes when the active region changes: the opcode
/// lookup table and the region-specific constants a decoder needs.
///
/// Bundled into one struct so a single [`arc_swap::ArcSwap::load_full`] call
/// gives a frame a consistent view of both — a frame must never see the new
/// opcode names paired with the old constants or vice versa.
pub struct RegionData<C> {
    /// Opcode-to-message-name lookup for the active region.
    pub opcodes: OpcodeIndex,
    /// Region constants, absent until the config source has loaded them.
    ///
    /// While absent, IPC segments are still named and emitted, just never
    /// handed to a decoder — there is nothing to decode them with yet.
    pub constants: Option<Arc<C>>,
}

impl<C> RegionData<C> {
    /// No opcode names, no constants. Every opcode reads back as `"unknown"`.
    #[must_use]
    pub fn empty() -> Self {
        Self { opcodes: OpcodeIndex::empty(), constants: None }
    }
}

impl<C> Default for RegionData<C> {
    fn default() -> Self {
        Self::empty()
    }
}

/// The stateful capture pipeline: reassembly, decompression, dispatch, and
/// the event bus, generic over the region constants type `C` a concrete
/// decoder table needs.
pub struct Pipeline<C> {
    flows: FlowTable,
    region: Arc<ArcSwap<RegionData<C>>>,
    decoders: Arc<DecoderRegistry<C>>,
    events: EventBus,
}

/// A detached handle that can replace a pipeline's active region data from
/// any thread, independent of wherever the [`Pipeline`] itself ended up
/// living (typically a dedicated capture thread — see `wiresniff-capture`).
///
/// This is how `setRegion` (`spec.md` §6) is implemented without requiring
/// the caller to hold a `&mut Pipeline`: a frame already mid-flight took its
/// own snapshot of the old [`Arc<ArcSwap<RegionData<C>>>`] at the start of
/// processing, so a region switch is never observed as a torn mix of old and
/// new data within one frame.
pub struct RegionHandle<C> {
    region: Arc<ArcSwap<RegionData<C>>>,
    ready: crate::events::EventHandles,
}

impl<C> Clone for RegionHandle<C> {
    fn clone(&self) -> Self {
        Self { region: Arc::clone(&self.region), ready: self.ready.clone() }
    }
}

impl<C> RegionHandle<C>
where
    C: Send + Sync + 'static,
{
    /// Atomically replace the active opcode index and region constants, and
    /// fire `ready` (idempotent; harmless to fire again on a later region
    /// switch).
    pub fn set(&self, opcodes: OpcodeIndex, constants: Option<C>) {
        self.region.store(Arc::new(RegionData { opcodes, constants: constants.map(Arc::new) }));
        self.ready.mark_ready();
    }
}

impl<C> Pipeline<C>
where
    C: Send + Sync + 'static,
{
    /// Build a pipeline with the given decoder table and no region data
    /// loaded yet (every opcode will read back as `"unknown"`).
    #[must_use]
    pub fn new(decoders: DecoderRegistry<C>) -> Self {
        Self {
            flows: FlowTable::new(),
            region: Arc::new(ArcSwap::from_pointee(RegionData::empty())),
            decoders: Arc::new(decoders),
            events: EventBus::default(),
        }
    }

    /// The event bus every subscriber attaches to.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Detached subscription handles, cloneable and valid even after this
    /// pipeline has been moved onto a dedicated capture thread.
    #[must_use]
    pub fn event_handles(&self) -> crate::events::EventHandles {
        self.events.handles()
    }

    /// A detached handle for setting region data from outside this
    /// pipeline, e.g. after it has been moved onto a capture thread.
    #[must_use]
    pub fn region_handle(&self) -> RegionHandle<C> {
        RegionHandle { region: Arc::clone(&self.region), ready: self.events.handles() }
    }

    /// Atomically replace the active opcode index and region constants, and
    /// fire `ready` if this is the first time region data has been set.
    ///
    /// A frame already mid-flight through [`Self::handle_payload`] took its
    /// own snapshot at the start of processing, so it finishes against
    /// whichever data was current when it started rather than observing a
    /// torn mix of old and new.
    pub fn set_region_data(&self, opcodes: OpcodeIndex, constants: Option<C>) {
        self.region.store(Arc::new(RegionData { opcodes, constants: constants.map(Arc::new) }));
        self.events.mark_ready();
    }

    /// Feed one TCP payload chunk observed flowing from `source` to
    /// `destination` (keyed internally by `destination`'s port) into the
    /// pipeline.
    ///
    /// Drains and processes every frame that becomes complete as a result;
    /// a chunk that only partially completes a frame is buffered and
    /// produces no events until the rest arrives.
    pub fn handle_payload(&mut self, source: SocketAddr, destination: SocketAddr, bytes: &[u8]) {
        let buffer = self.flows.buffer_mut(destination.port());
        if let Err(err) = buffer.push(bytes) {
            tracing::warn!(%destination, error = %err, "flow buffer rejected payload");
            self.events.emit_error(ErrorEvent { message: Arc::from(err.to_string()) });
            return;
        }

        for frame in drain_frames(buffer) {
            self.process_frame(source, destination, frame);
        }
    }

    /// Drop flows that have gone idle, if this pipeline's flow table was
    /// built with a TTL. A no-op otherwise.
    pub fn sweep_flows(&mut self) {
        self.flows.sweep();
    }

    fn process_frame(&self, source: SocketAddr, destination: SocketAddr, frame: RawFrame) {
        let started = Instant::now();

        let body = match self.decompress(&frame) {
            Some(Ok(body)) => body,
            Some(Err(err)) => {
                tracing::warn!(%destination, error = %err, "failed to inflate frame body");
                self.events.emit_error(ErrorEvent { message: Arc::from(err.to_string()) });
                return;
            }
            // Header check failure: still encrypted, frame is dropped quietly.
            None => {
                tracing::trace!(%destination, "dropping still-encrypted frame");
                return;
            },
        };

        let region = self.region.load_full();
        let mut segments = Vec::with_capacity(frame.header.segment_count() as usize);
        let mut offset = 0usize;

        for _ in 0..frame.header.segment_count() {
            let Some(header_bytes) = body.get(offset..offset + SegmentHeader::SIZE) else {
                break;
            };
            let Ok(header) = SegmentHeader::parse(header_bytes) else {
                break;
            };

            let total_size = header.size() as usize;
            if total_size < SegmentHeader::SIZE {
                break;
            }
            let Some(segment_bytes) = body.get(offset..offset + total_size) else {
                break;
            };

            let segment = self.build_segment(header, &segment_bytes[SegmentHeader::SIZE..], &region);
            offset += total_size;

            if header.segment_type() == SegmentType::Ipc {
                // Emitted unconditionally for every IPC segment, even one
                // whose body was too short to parse an `IpcHeader` out of —
                // `message` fires iff the segment type is IPC, full stop.
                let name = segment
                    .ipc_header
                    .as_ref()
                    .map(|ipc_header| region.opcodes.lookup(ipc_header.opcode()))
                    .unwrap_or_else(|| Arc::from(crate::opcodes::UNKNOWN_NAME));
                self.events.emit_message(MessageEvent { name, segment: segment.clone() });
            }

            self.events.emit_segment(SegmentEvent { source, destination, segment: segment.clone() });
            segments.push(segment);
        }

        self.events.emit_packet(PacketEvent { source, destination, header: frame.header, segments });
        self.events
            .emit_diagnostics(DiagnosticsEvent { last_processing_time: started.elapsed() });
    }

    /// Inflate the frame body if compressed.
    ///
    /// Returns `None` for a header-check failure (still-encrypted frame,
    /// dropped silently), `Some(Err(_))` for any other inflate failure, and
    /// `Some(Ok(_))` with the decompressed (or already-plain) body otherwise.
    fn decompress(&self, frame: &RawFrame) -> Option<Result<Vec<u8>, FrameError>> {
        if !frame.header.is_compressed() {
            return Some(Ok(frame.body().to_vec()));
        }

        let mut decoder = ZlibDecoder::new(frame.body());
        let mut out = Vec::with_capacity(frame.header.decompressed_length() as usize);
        match decoder.read_to_end(&mut out) {
            Ok(_) => Some(Ok(out)),
            Err(err) if err.to_string().contains("incorrect header check") => None,
            Err(err) => Some(Err(FrameError::Inflate(err))),
        }
    }

    fn build_segment(
        &self,
        header: SegmentHeader,
        rest: &[u8],
        region: &RegionData<C>,
    ) -> Segment {
        if header.segment_type() != SegmentType::Ipc {
            return Segment { header, ipc_header: None, ipc_data: None, parsed_ipc_data: None };
        }

        let Ok(ipc_header) = IpcHeader::parse(rest) else {
            return Segment { header, ipc_header: None, ipc_data: None, parsed_ipc_data: None };
        };
        let ipc_body = &rest[IpcHeader::SIZE.min(rest.len())..];
        let ipc_data = Bytes::copy_from_slice(ipc_body);

        let name = region.opcodes.lookup(ipc_header.opcode());
        let parsed_ipc_data = region.constants.as_ref().and_then(|constants| {
            let mut reader = BufferReader::new(ipc_body);
            match self.decoders.decode(&name, &mut reader, constants) {
                Some(Ok(parsed)) => Some(Arc::<dyn crate::registry::ParsedIpc>::from(parsed)),
                Some(Err(err)) => {
                    tracing::warn!(name = %name, error = %err, "decoder failed");
                    self.events.emit_error(ErrorEvent {
                        message: Arc::from(
                            FrameError::Decode { name: name.to_string(), source: err }.to_string(),
                        ),
                    });
                    None
                }
                None => None,
            }
        });

        Segment { header, ipc_header: Some(ipc_header), ipc_data: Some(ipc_data), parsed_ipc_data }
    }
}
