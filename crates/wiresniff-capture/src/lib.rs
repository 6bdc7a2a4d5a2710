//! Capture-driver boundary: opens the packet-capture device, applies the
//! protocol's BPF filter, decodes Ethernet/IPv4/TCP, and feeds PSH payloads
//! into a [`wiresniff_core::Pipeline`].
//!
//! Everything downstream of [`link::decode_psh_payload`] is link-layer
//! agnostic; this is the only crate in the workspace that links against
//! `pcap`.

pub mod bpf;
pub mod engine;
pub mod error;
pub mod link;

pub use bpf::{FILTER, PORT_RANGES};
pub use engine::{CaptureEngine, list_devices};
pub use error::CaptureError;
pub use link::{PshPayload, decode_psh_payload};
