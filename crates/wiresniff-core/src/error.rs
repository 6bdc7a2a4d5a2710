//! Pipeline-level error types.

use thiserror::Error;

/// Errors surfaced on the `error` event stream while processing a single
/// frame. None of these stop the pipeline — they're reported and the next
/// frame is processed normally.
#[derive(Error, Debug)]
pub enum FrameError {
    /// zlib reported something other than "incorrect header check" while
    /// inflating a compressed body.
    ///
    /// A header-check failure means the frame is still encrypted (handshake
    /// in progress) and is dropped silently by the caller instead of being
    /// routed through this variant — see `wiresniff-core::processor`.
    #[error("failed to inflate frame body: {0}")]
    Inflate(#[from] std::io::Error),

    /// A registered decoder returned an error while parsing an IPC body.
    #[error("decoder for \"{name}\" failed: {source}")]
    Decode {
        /// Message name the decoder was registered under.
        name: String,
        /// Underlying decode error.
        source: DecodeError,
    },
}

/// Error returned by an individual message decoder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The IPC body ran out before every expected field was read.
    #[error("ipc body truncated while decoding")]
    Truncated,
}
