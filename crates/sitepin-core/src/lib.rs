//! # sitepin-core — Foundational Types for sitepin
//!
//! Defines the values that flow through a deployment: the set of site
//! assets collected from disk, the content identifier (CID) returned by the
//! pinning service, and the DNSLink value derived from it.
//!
//! ## Crate Policy
//!
//! - No network access. HTTP clients live in `sitepin-client`.
//! - No dependencies on other `sitepin-*` crates (this is the leaf of the DAG).
//! - No `.unwrap()` outside tests.

pub mod assets;
pub mod error;
pub mod identity;

// Re-export primary types for ergonomic imports.
pub use assets::{collect_assets, AssetSet, FileEntry};
pub use error::CoreError;
pub use identity::{ContentId, DnsLink};
