//! # sitepin-client — Typed HTTP clients for a sitepin deployment
//!
//! Provides one client per external service a deployment touches:
//! - **Pinning** via Pinata `pinFileToIPFS` ([`PinningClient`])
//! - **Gateway resolution** via a public IPFS gateway ([`GatewayClient`])
//! - **DNSLink publishing** via Cloudflare Web3 hostnames or a Netlify DNS
//!   zone ([`dns::DnsPublisher`])
//!
//! ## Timeout & Retry
//!
//! Every client carries a per-request timeout from [`DeployConfig`]. Only
//! the gateway waiter retries, through [`retry::poll_with_timeout`]; the
//! upload and DNS calls are attempted once.

pub mod config;
pub mod dns;
pub mod error;
pub mod gateway;
pub(crate) mod http;
pub mod pinning;
pub mod retry;

pub use config::{ConfigError, DeployConfig, DnsConfig, DnsProviderKind};
pub use dns::{ConfiguredPublisher, DnsPublisher};
pub use error::ClientError;
pub use gateway::GatewayClient;
pub use pinning::PinningClient;
pub use retry::RetryPolicy;
