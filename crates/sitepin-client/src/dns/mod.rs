//! # DNSLink Publishing
//!
//! Points a domain at a CID. Two provider protocols share one
//! [`DnsPublisher`] capability:
//!
//! - [`CloudflarePublisher`]: a single PATCH of a Web3 hostname's `dnslink`.
//! - [`NetlifyPublisher`]: list, create, then delete TXT records on
//!   `_dnslink.<domain>` so a valid record exists at every moment.
//!
//! [`ConfiguredPublisher`] picks one of them from [`DnsConfig`].

pub mod cloudflare;
pub mod netlify;

use std::future::Future;

use sitepin_core::ContentId;

use crate::config::DnsConfig;
use crate::error::ClientError;

pub use cloudflare::CloudflarePublisher;
pub use netlify::{DnsRecord, NetlifyPublisher};

/// Publishes a DNSLink for a CID.
pub trait DnsPublisher {
    /// Point the configured name at `cid`.
    fn publish(&self, cid: &ContentId) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Short provider name for logs and errors.
    fn provider_name(&self) -> &'static str;
}

/// The publisher selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredPublisher {
    Cloudflare(CloudflarePublisher),
    Netlify(NetlifyPublisher),
}

impl ConfiguredPublisher {
    /// Build the publisher for the configured provider.
    pub fn new(config: &DnsConfig) -> Result<Self, ClientError> {
        Ok(match config {
            DnsConfig::Cloudflare(cf) => Self::Cloudflare(CloudflarePublisher::new(cf)?),
            DnsConfig::Netlify(netlify) => Self::Netlify(NetlifyPublisher::new(netlify)?),
        })
    }
}

impl DnsPublisher for ConfiguredPublisher {
    async fn publish(&self, cid: &ContentId) -> Result<(), ClientError> {
        match self {
            Self::Cloudflare(p) => p.publish(cid).await,
            Self::Netlify(p) => p.publish(cid).await,
        }
    }

    fn provider_name(&self) -> &'static str {
        match self {
            Self::Cloudflare(p) => p.provider_name(),
            Self::Netlify(p) => p.provider_name(),
        }
    }
}
