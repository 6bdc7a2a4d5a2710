//! Errors surfaced by the public [`crate::Sniffer`] facade.

use thiserror::Error;

/// Errors that propagate synchronously from [`crate::Sniffer::open`].
///
/// Per `spec.md` §7, these are the only two error kinds (`NetworkConfig`,
/// `AssetLoadFailure`) that ever reach the caller of the public surface —
/// every per-packet condition is demoted to an `error` event instead.
#[derive(Error, Debug)]
pub enum SnifferError {
    /// Opening the capture device or applying the BPF filter failed.
    #[error("capture device error: {0}")]
    Capture(#[from] wiresniff_capture::CaptureError),

    /// Fetching the region's opcode or constants catalogs failed; `ready`
    /// never fires for this `open` call.
    #[error("failed to load region catalogs: {0}")]
    Config(#[from] wiresniff_config::ConfigError),

    /// [`crate::Sniffer::set_region`] or [`crate::Sniffer::events`] was
    /// called before [`crate::Sniffer::open`] succeeded.
    #[error("sniffer has not been opened yet")]
    NotOpen,
}
