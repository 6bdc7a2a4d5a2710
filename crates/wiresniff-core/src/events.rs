//! Typed event bus: `packet`, `segment`, `message`, `diagnostics`, `error`,
//! and the one-shot `ready` signal.
//!
//! `packet`/`segment`/`message`/`diagnostics`/`error` are `tokio::sync::broadcast`
//! channels — ordinary fan-out, a lagging subscriber gets
//! `RecvError::Lagged` rather than blocking the pipeline. `ready` is a
//! `tokio::sync::watch` channel instead: a `watch` always hands a
//! newly-subscribed receiver the most recently sent value, which is exactly
//! the "late-join" delivery the `ready` event needs — no separate bookkeeping
//! for "has this already fired" required.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use bytes::Bytes;
use tokio::sync::{broadcast, watch};
use wiresniff_proto::{FrameHeader, IpcHeader, SegmentHeader};

use crate::registry::ParsedIpc;

/// Default channel capacity for the broadcast event streams.
///
/// Sized generously relative to a single frame's segment count; a consumer
/// that falls this far behind has bigger problems than a few dropped events.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// One decoded (or not) segment, as attached to `segment`, `message`, and
/// the containing `packet` event.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Parsed segment header.
    pub header: SegmentHeader,
    /// Parsed IPC header, present only for IPC segments.
    pub ipc_header: Option<IpcHeader>,
    /// Raw IPC body bytes, present only for IPC segments.
    pub ipc_data: Option<Bytes>,
    /// Decoded record, present only when a decoder was registered for this
    /// opcode's name and region constants were available.
    pub parsed_ipc_data: Option<Arc<dyn ParsedIpc>>,
}

/// A fully reassembled frame, as delivered on the `packet` event.
#[derive(Debug, Clone)]
pub struct PacketEvent {
    /// Flow source address.
    pub source: SocketAddr,
    /// Flow destination address (the flow key).
    pub destination: SocketAddr,
    /// The frame's header.
    pub header: FrameHeader,
    /// Every segment the frame's body was split into, in on-wire order.
    pub segments: Vec<Segment>,
}

/// One segment, as delivered on the `segment` event.
#[derive(Debug, Clone)]
pub struct SegmentEvent {
    /// Flow source address.
    pub source: SocketAddr,
    /// Flow destination address.
    pub destination: SocketAddr,
    /// The segment itself.
    pub segment: Segment,
}

/// A named IPC message, as delivered on the `message` event.
///
/// Emitted if and only if the segment's type is IPC — non-IPC segments
/// never produce a `message` event, only `segment`.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    /// Looked-up message name (`"unknown"` for an unmapped opcode).
    pub name: Arc<str>,
    /// The IPC segment the message came from.
    pub segment: Segment,
}

/// Per-frame processing timing, as delivered on the `diagnostics` event.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticsEvent {
    /// Wall-clock time spent processing the frame that just completed.
    pub last_processing_time: Duration,
}

/// A non-fatal error encountered while processing one frame.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    /// Human-readable description of what went wrong.
    pub message: Arc<str>,
}

/// Fan-out point for everything the pipeline produces.
pub struct EventBus {
    packet: broadcast::Sender<PacketEvent>,
    segment: broadcast::Sender<SegmentEvent>,
    message: broadcast::Sender<MessageEvent>,
    diagnostics: broadcast::Sender<DiagnosticsEvent>,
    error: broadcast::Sender<ErrorEvent>,
    ready: watch::Sender<bool>,
}

impl EventBus {
    /// Build a bus whose broadcast channels each hold `capacity` pending
    /// events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            packet: broadcast::channel(capacity).0,
            segment: broadcast::channel(capacity).0,
            message: broadcast::channel(capacity).0,
            diagnostics: broadcast::channel(capacity).0,
            error: broadcast::channel(capacity).0,
            ready: watch::channel(false).0,
        }
    }

    /// Subscribe to `packet` events.
    #[must_use]
    pub fn subscribe_packet(&self) -> broadcast::Receiver<PacketEvent> {
        self.packet.subscribe()
    }

    /// Subscribe to `segment` events.
    #[must_use]
    pub fn subscribe_segment(&self) -> broadcast::Receiver<SegmentEvent> {
        self.segment.subscribe()
    }

    /// Subscribe to `message` events.
    #[must_use]
    pub fn subscribe_message(&self) -> broadcast::Receiver<MessageEvent> {
        self.message.subscribe()
    }

    /// Subscribe to `diagnostics` events.
    #[must_use]
    pub fn subscribe_diagnostics(&self) -> broadcast::Receiver<DiagnosticsEvent> {
        self.diagnostics.subscribe()
    }

    /// Subscribe to `error` events.
    #[must_use]
    pub fn subscribe_error(&self) -> broadcast::Receiver<ErrorEvent> {
        self.error.subscribe()
    }

    /// Subscribe to the `ready` signal. A subscriber joining after `ready`
    /// already fired immediately observes `true`.
    #[must_use]
    pub fn subscribe_ready(&self) -> watch::Receiver<bool> {
        self.ready.subscribe()
    }

    /// Fire `ready`. Idempotent: firing it again is harmless, existing and
    /// future subscribers alike just see `true`.
    pub fn mark_ready(&self) {
        // A closed channel (no subscribers, none will ever join) is not an
        // error here — `ready` is fire-and-forget.
        let _ = self.ready.send(true);
    }

    /// Emit a `packet` event. No-op if nobody is subscribed.
    pub fn emit_packet(&self, event: PacketEvent) {
        let _ = self.packet.send(event);
    }

    /// Emit a `segment` event. No-op if nobody is subscribed.
    pub fn emit_segment(&self, event: SegmentEvent) {
        let _ = self.segment.send(event);
    }

    /// Emit a `message` event. No-op if nobody is subscribed.
    pub fn emit_message(&self, event: MessageEvent) {
        let _ = self.message.send(event);
    }

    /// Emit a `diagnostics` event. No-op if nobody is subscribed.
    pub fn emit_diagnostics(&self, event: DiagnosticsEvent) {
        let _ = self.diagnostics.send(event);
    }

    /// Emit an `error` event. No-op if nobody is subscribed.
    pub fn emit_error(&self, event: ErrorEvent) {
        let _ = self.error.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

/// A cheaply-cloned set of subscription handles, detached from the
/// [`EventBus`]/[`crate::processor::Pipeline`] that created them.
///
/// `Pipeline` typically ends up owned by a dedicated capture thread (see
/// `wiresniff-capture`), so a public facade that wants to keep offering
/// `subscribe_*` after `open()` has moved the pipeline away takes a clone of
/// this instead of holding onto the bus itself.
#[derive(Clone)]
pub struct EventHandles {
    packet: broadcast::Sender<PacketEvent>,
    segment: broadcast::Sender<SegmentEvent>,
    message: broadcast::Sender<MessageEvent>,
    diagnostics: broadcast::Sender<DiagnosticsEvent>,
    error: broadcast::Sender<ErrorEvent>,
    ready: watch::Sender<bool>,
}

impl EventBus {
    /// Clone out a detached [`EventHandles`] bundle.
    #[must_use]
    pub fn handles(&self) -> EventHandles {
        EventHandles {
            packet: self.packet.clone(),
            segment: self.segment.clone(),
            message: self.message.clone(),
            diagnostics: self.diagnostics.clone(),
            error: self.error.clone(),
            ready: self.ready.clone(),
        }
    }
}

impl EventHandles {
    /// Subscribe to `packet` events.
    #[must_use]
    pub fn subscribe_packet(&self) -> broadcast::Receiver<PacketEvent> {
        self.packet.subscribe()
    }

    /// Subscribe to `segment` events.
    #[must_use]
    pub fn subscribe_segment(&self) -> broadcast::Receiver<SegmentEvent> {
        self.segment.subscribe()
    }

    /// Subscribe to `message` events.
    #[must_use]
    pub fn subscribe_message(&self) -> broadcast::Receiver<MessageEvent> {
        self.message.subscribe()
    }

    /// Subscribe to `diagnostics` events.
    #[must_use]
    pub fn subscribe_diagnostics(&self) -> broadcast::Receiver<DiagnosticsEvent> {
        self.diagnostics.subscribe()
    }

    /// Subscribe to `error` events.
    #[must_use]
    pub fn subscribe_error(&self) -> broadcast::Receiver<ErrorEvent> {
        self.error.subscribe()
    }

    /// Subscribe to the `ready` signal, with late-join semantics.
    #[must_use]
    pub fn subscribe_ready(&self) -> watch::Receiver<bool> {
        self.ready.subscribe()
    }

    /// Fire `ready`. Idempotent, same as [`EventBus::mark_ready`].
    pub fn mark_ready(&self) {
        let _ = self.ready.send(true);
    }
}
