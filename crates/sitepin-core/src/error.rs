//! # Error Types
//!
//! Errors raised before any network call is made: reading the asset
//! directory and validating identifiers.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for `sitepin-core`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The asset directory (or an entry below it) could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying filesystem error.
        source: std::io::Error,
    },

    /// The asset root exists but is not a directory.
    #[error("{} is not a directory", path.display())]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },

    /// A content identifier was empty or whitespace.
    #[error("invalid content identifier: {0:?}")]
    InvalidContentId(String),
}
