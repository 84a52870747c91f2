//! Gateway resolution waiter.
//!
//! Freshly pinned content takes a while to propagate to public gateways.
//! [`GatewayClient::wait_until_resolvable`] polls `{gateway}/ipfs/<cid>`
//! under a [`RetryPolicy`] and fails the deployment if the content never
//! becomes retrievable, so DNS is never pointed at unverified content.

use sitepin_core::ContentId;

use crate::config::GatewayConfig;
use crate::error::ClientError;
use crate::http;
use crate::retry::{self, RetryPolicy};

/// Outcome of one gateway probe that did not succeed.
#[derive(Debug, thiserror::Error)]
enum ProbeError {
    #[error("gateway returned {0}")]
    Status(reqwest::StatusCode),
    #[error("gateway request failed: {0}")]
    Transport(reqwest::Error),
}

/// Client polling a public IPFS gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    gateway_url: url::Url,
    policy: RetryPolicy,
}

impl GatewayClient {
    /// Create a new gateway client from configuration.
    ///
    /// No transport-level timeout is set: every probe is bounded by the
    /// policy's attempt timeout instead.
    pub fn new(config: &GatewayConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            gateway_url: config.gateway_url.clone(),
            policy: config.policy,
        })
    }

    /// Polling policy in effect.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Gateway URL serving `cid`.
    pub fn content_url(&self, cid: &ContentId) -> String {
        http::endpoint_url(&self.gateway_url, &format!("ipfs/{cid}"))
    }

    /// Wait until the gateway serves `cid` with a 2xx status.
    ///
    /// Returns the attempt number that succeeded.
    ///
    /// # Errors
    ///
    /// [`ClientError::ResolutionTimedOut`] once the policy's attempts are
    /// used up without a 2xx response.
    pub async fn wait_until_resolvable(&self, cid: &ContentId) -> Result<u32, ClientError> {
        let url = self.content_url(cid);
        tracing::info!(
            cid = %cid,
            url = %url,
            max_attempts = self.policy.attempts,
            "waiting for CID to resolve on gateway"
        );

        let http = &self.http;
        let url = url.as_str();
        let outcome = retry::poll_with_timeout(&self.policy, move |attempt| async move {
            tracing::debug!(attempt, "probing gateway");
            let resp = http.get(url).send().await.map_err(ProbeError::Transport)?;
            if resp.status().is_success() {
                Ok(())
            } else {
                Err(ProbeError::Status(resp.status()))
            }
        })
        .await;

        match outcome {
            Ok(((), attempt)) => {
                tracing::info!(cid = %cid, attempt, "CID resolved on gateway");
                Ok(attempt)
            }
            Err(exhausted) => {
                tracing::warn!(cid = %cid, "{exhausted}");
                Err(ClientError::ResolutionTimedOut {
                    cid: cid.clone(),
                    attempts: exhausted.attempts,
                })
            }
        }
    }
}
