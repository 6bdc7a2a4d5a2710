//! Capture-driver error type.

use thiserror::Error;

/// Errors opening or running the packet-capture device.
///
/// Per `spec.md` §7 (`NetworkConfig`), every variant here propagates
/// synchronously from [`crate::engine::CaptureEngine::open`] — capture never
/// starts if one of these fires.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No device matches the requested identifier.
    #[error("no capture device named {0:?}")]
    DeviceNotFound(String),

    /// The underlying capture library failed to enumerate devices, open the
    /// device, or compile/apply the BPF filter.
    #[error("capture device error: {0}")]
    Pcap(#[from] pcap::Error),

    /// The capture thread panicked or never started.
    #[error("capture thread failed to start")]
    ThreadStartFailure,
}
