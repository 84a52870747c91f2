//! Cloudflare Web3 hostname publisher.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | PATCH  | `/zones/{zone_id}/web3/hostnames/{hostname_id}` | Set the hostname's `dnslink` |
//!
//! Cloudflare wraps every response in an envelope with a `success` flag.
//! The flag, not the HTTP status, decides the outcome.

use serde::{Deserialize, Serialize};
use sitepin_core::ContentId;

use crate::config::CloudflareConfig;
use crate::dns::DnsPublisher;
use crate::error::ClientError;
use crate::http;

const PROVIDER: &str = "cloudflare";
const ENDPOINT: &str = "PATCH /zones/{zone_id}/web3/hostnames/{hostname_id}";

#[derive(Debug, Serialize)]
struct UpdateHostnameRequest<'a> {
    dnslink: &'a str,
}

/// Cloudflare v4 API response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudflareEnvelope {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<CloudflareMessage>,
    #[serde(default)]
    pub messages: Vec<CloudflareMessage>,
    #[serde(default)]
    pub result: Option<Web3Hostname>,
}

/// Entry of an envelope's `errors` or `messages` list.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudflareMessage {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

/// Web3 hostname resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Web3Hostname {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dnslink: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Publishes a DNSLink by patching a Cloudflare Web3 hostname.
#[derive(Debug, Clone)]
pub struct CloudflarePublisher {
    http: reqwest::Client,
    url: String,
}

impl CloudflarePublisher {
    /// Create a new Cloudflare publisher from configuration.
    pub fn new(config: &CloudflareConfig) -> Result<Self, ClientError> {
        let headers = http::bearer_headers("CLOUDFLARE_API_KEY", &config.api_key)?;
        let url = http::endpoint_url(
            &config.api_url,
            &format!(
                "zones/{}/web3/hostnames/{}",
                config.zone_id, config.hostname_id
            ),
        );
        Ok(Self {
            http: http::build_client(config.timeout, headers)?,
            url,
        })
    }

    async fn patch_dnslink(&self, cid: &ContentId) -> Result<(), ClientError> {
        let dnslink = cid.dnslink().path();
        tracing::info!(dnslink = %dnslink, "updating Cloudflare Web3 hostname");

        let request = self
            .http
            .patch(&self.url)
            .json(&UpdateHostnameRequest { dnslink: &dnslink });
        let resp = http::send(request, ENDPOINT).await?;
        let status = resp.status();
        let body = http::read_body(resp, ENDPOINT).await?;

        let envelope: CloudflareEnvelope = match http::decode(&body, ENDPOINT) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(ClientError::Api {
                    endpoint: ENDPOINT.into(),
                    status: status.as_u16(),
                    body,
                });
            }
            Err(e) => return Err(e),
        };

        if !envelope.success {
            for err in &envelope.errors {
                tracing::warn!(code = ?err.code, "Cloudflare error: {}", err.message);
            }
            return Err(ClientError::Rejected {
                provider: PROVIDER,
                body,
            });
        }

        let hostname = envelope.result.as_ref().and_then(|r| r.name.as_deref());
        tracing::info!(dnslink = %dnslink, hostname = ?hostname, "DNSLink updated");
        Ok(())
    }
}

impl DnsPublisher for CloudflarePublisher {
    async fn publish(&self, cid: &ContentId) -> Result<(), ClientError> {
        self.patch_dnslink(cid).await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
