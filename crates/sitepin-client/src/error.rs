//! Client error types.

use std::path::PathBuf;

use sitepin_core::ContentId;

/// Errors from pinning, gateway, and DNS provider calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Provider returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body did not match the expected schema.
    #[error("failed to decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
    /// Request body could not be encoded.
    #[error("failed to encode request for {endpoint}: {reason}")]
    Encode { endpoint: String, reason: String },
    /// Pinning service accepted the upload but returned no CID.
    #[error("upload accepted but no CID returned: {body}")]
    MissingCid { body: String },
    /// Gateway never served the CID within the retry budget.
    #[error("resolution of {cid} timed out after {attempts} attempts")]
    ResolutionTimedOut { cid: ContentId, attempts: u32 },
    /// DNS provider answered with a non-success indicator.
    #[error("{provider} rejected the DNSLink update: {body}")]
    Rejected {
        provider: &'static str,
        body: String,
    },
    /// A site asset could not be read for upload.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
