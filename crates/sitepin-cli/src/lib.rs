//! # sitepin-cli — Static site deployment to IPFS with DNSLink
//!
//! Pins the built site in `./dist` with Pinata, waits until a public
//! gateway serves the resulting CID, then points the domain's DNSLink at it
//! through Cloudflare or Netlify.
//!
//! ## Crate Policy
//!
//! - Argument parsing and tracing setup live in `main.rs`.
//! - Provider HTTP calls are delegated to `sitepin-client`; this crate only
//!   sequences them.

pub mod error;
pub mod pipeline;

pub use error::DeployError;
pub use pipeline::{DeployOutcome, Pipeline};
