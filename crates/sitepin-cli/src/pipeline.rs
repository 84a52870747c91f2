//! # Deployment Pipeline
//!
//! Runs collect → upload → wait → publish strictly in sequence. Each stage
//! consumes only the previous stage's output (a path, then a CID). The first
//! failure aborts the run; completed stages are not rolled back, so a pin
//! made before a failed DNS update is left in place.

use std::path::Path;

use sitepin_client::{
    ConfiguredPublisher, DeployConfig, DnsPublisher, GatewayClient, PinningClient,
};
use sitepin_core::{collect_assets, ContentId};

use crate::error::DeployError;

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// The site was pinned, resolved, and the DNSLink now points at `cid`.
    Published { cid: ContentId, files: usize },
    /// The asset directory held no files; nothing was uploaded.
    NothingToDeploy,
}

/// One deployment: pinning client, gateway waiter, and DNS publisher.
#[derive(Debug, Clone)]
pub struct Pipeline<P = ConfiguredPublisher> {
    pinning: PinningClient,
    gateway: GatewayClient,
    publisher: P,
}

impl Pipeline<ConfiguredPublisher> {
    /// Build every client from configuration.
    pub fn from_config(config: &DeployConfig) -> Result<Self, DeployError> {
        let pinning = PinningClient::new(&config.pinata).map_err(|source| DeployError::Setup {
            client: "pinning",
            source,
        })?;
        let gateway = GatewayClient::new(&config.gateway).map_err(|source| DeployError::Setup {
            client: "gateway",
            source,
        })?;
        let publisher =
            ConfiguredPublisher::new(&config.dns).map_err(|source| DeployError::Setup {
                client: "dns",
                source,
            })?;
        Ok(Self::new(pinning, gateway, publisher))
    }
}

impl<P: DnsPublisher> Pipeline<P> {
    /// Assemble a pipeline from already-built clients.
    pub fn new(pinning: PinningClient, gateway: GatewayClient, publisher: P) -> Self {
        Self {
            pinning,
            gateway,
            publisher,
        }
    }

    /// Deploy the site found in `dist`.
    pub async fn run(&self, dist: &Path) -> Result<DeployOutcome, DeployError> {
        let assets = collect_assets(dist).map_err(DeployError::Collect)?;
        if assets.is_empty() {
            tracing::info!(dist = %dist.display(), "no files were found in the asset directory; nothing to deploy");
            return Ok(DeployOutcome::NothingToDeploy);
        }
        tracing::info!(dist = %dist.display(), files = assets.len(), "collected site assets");

        let cid = self
            .pinning
            .pin_directory(&assets)
            .await
            .map_err(DeployError::Upload)?;

        self.gateway
            .wait_until_resolvable(&cid)
            .await
            .map_err(DeployError::Resolve)?;

        let provider = self.publisher.provider_name();
        self.publisher
            .publish(&cid)
            .await
            .map_err(|source| DeployError::Publish { provider, source })?;

        tracing::info!(cid = %cid, provider, "deployment complete");
        Ok(DeployOutcome::Published {
            cid,
            files: assets.len(),
        })
    }
}
