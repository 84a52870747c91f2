//! Deployment errors, tagged with the stage that raised them.

use sitepin_client::{ClientError, ConfigError};
use sitepin_core::CoreError;

/// A failed deployment run. Every variant aborts the remaining stages.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Configuration could not be loaded.
    #[error("invalid configuration")]
    Config(#[source] ConfigError),
    /// A client could not be constructed.
    #[error("failed to initialise {client} client")]
    Setup {
        client: &'static str,
        #[source]
        source: ClientError,
    },
    /// The asset directory could not be read.
    #[error("asset collection failed")]
    Collect(#[source] CoreError),
    /// Pinning the assets failed.
    #[error("upload failed")]
    Upload(#[source] ClientError),
    /// The CID never became retrievable through the gateway.
    #[error("gateway resolution failed")]
    Resolve(#[source] ClientError),
    /// The DNS provider did not accept the new DNSLink.
    #[error("DNSLink publish via {provider} failed")]
    Publish {
        provider: &'static str,
        #[source]
        source: ClientError,
    },
}

impl DeployError {
    /// Pipeline stage name, for logs.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::Setup { .. } => "setup",
            Self::Collect(_) => "collect",
            Self::Upload(_) => "upload",
            Self::Resolve(_) => "resolve",
            Self::Publish { .. } => "publish",
        }
    }
}
