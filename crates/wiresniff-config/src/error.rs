//! Config-loader error type.

use thiserror::Error;

/// Errors fetching or parsing a region's opcode/constants catalogs.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The HTTP request itself failed (connection, TLS, timeout, ...).
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body wasn't the expected JSON shape.
    #[error("failed to parse catalog response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The static/offline source has no catalog loaded for the requested
    /// region.
    #[error("no catalog configured for region {0}")]
    RegionNotConfigured(String),
}
