//! Netlify DNS zone publisher.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/dns_zones/{zone_id}/dns_records` | List records |
//! | POST   | `/dns_zones/{zone_id}/dns_records` | Create record |
//! | DELETE | `/dns_zones/{zone_id}/dns_records/{record_id}` | Delete record |
//!
//! Publishing replaces the `_dnslink.<domain>` TXT record: existing records
//! are looked up first, the new record is created, and only then are the
//! old ones deleted. A failed create aborts before anything is deleted. A
//! failed delete is logged and the publish still succeeds, because the new
//! record is already in place.

use serde::{Deserialize, Serialize};
use sitepin_core::{ContentId, DnsLink};

use crate::config::NetlifyConfig;
use crate::dns::DnsPublisher;
use crate::error::ClientError;
use crate::http;

const PROVIDER: &str = "netlify";
const TXT: &str = "TXT";

/// DNS record as returned by the Netlify API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub hostname: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub ttl: Option<u32>,
}

impl DnsRecord {
    /// True for a TXT record on `hostname` (case and trailing dot ignored).
    pub fn is_txt_for(&self, hostname: &str) -> bool {
        self.record_type.eq_ignore_ascii_case(TXT) && same_hostname(&self.hostname, hostname)
    }
}

fn same_hostname(a: &str, b: &str) -> bool {
    a.trim_end_matches('.')
        .eq_ignore_ascii_case(b.trim_end_matches('.'))
}

#[derive(Debug, Serialize)]
struct CreateDnsRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    hostname: &'a str,
    value: &'a str,
    ttl: u32,
}

/// Publishes a DNSLink by replacing the `_dnslink` TXT record of a Netlify zone.
#[derive(Debug, Clone)]
pub struct NetlifyPublisher {
    http: reqwest::Client,
    records_url: String,
    hostname: String,
    ttl: u32,
}

impl NetlifyPublisher {
    /// Create a new Netlify publisher from configuration.
    pub fn new(config: &NetlifyConfig) -> Result<Self, ClientError> {
        let headers = http::bearer_headers("NETLIFY_API_KEY", &config.api_key)?;
        Ok(Self {
            http: http::build_client(config.timeout, headers)?,
            records_url: http::endpoint_url(
                &config.api_url,
                &format!("dns_zones/{}/dns_records", config.zone_id),
            ),
            hostname: DnsLink::hostname_for(&config.domain),
            ttl: config.ttl,
        })
    }

    /// The `_dnslink.<domain>` hostname this publisher manages.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// List every record of the zone.
    ///
    /// Calls `GET {api_url}/dns_zones/{zone_id}/dns_records`.
    pub async fn list_records(&self) -> Result<Vec<DnsRecord>, ClientError> {
        let endpoint = "GET /dns_zones/{zone_id}/dns_records";
        let resp = http::send(self.http.get(&self.records_url), endpoint).await?;
        let resp = http::ensure_success(resp, endpoint).await?;
        let body = http::read_body(resp, endpoint).await?;
        http::decode(&body, endpoint)
    }

    /// Create a TXT record on the managed hostname.
    ///
    /// Calls `POST {api_url}/dns_zones/{zone_id}/dns_records`.
    pub async fn create_txt_record(&self, value: &str) -> Result<DnsRecord, ClientError> {
        let endpoint = "POST /dns_zones/{zone_id}/dns_records";
        let request = self.http.post(&self.records_url).json(&CreateDnsRecord {
            record_type: TXT,
            hostname: &self.hostname,
            value,
            ttl: self.ttl,
        });
        let resp = http::send(request, endpoint).await?;
        let resp = http::ensure_success(resp, endpoint).await?;
        let body = http::read_body(resp, endpoint).await?;
        http::decode(&body, endpoint)
    }

    /// Delete a record by id.
    ///
    /// Calls `DELETE {api_url}/dns_zones/{zone_id}/dns_records/{record_id}`.
    pub async fn delete_record(&self, record_id: &str) -> Result<(), ClientError> {
        let endpoint = format!("DELETE /dns_zones/{{zone_id}}/dns_records/{record_id}");
        let url = format!("{}/{record_id}", self.records_url);
        let resp = http::send(self.http.delete(&url), &endpoint).await?;
        http::ensure_success(resp, &endpoint).await?;
        Ok(())
    }

    async fn replace_dnslink(&self, cid: &ContentId) -> Result<(), ClientError> {
        let value = cid.dnslink().txt_value();

        let stale: Vec<DnsRecord> = self
            .list_records()
            .await?
            .into_iter()
            .filter(|r| r.is_txt_for(&self.hostname))
            .collect();
        for record in &stale {
            let previous = DnsLink::from_txt_value(&record.value);
            tracing::debug!(
                record_id = %record.id,
                previous = ?previous.as_ref().map(|l| l.path()),
                "found existing DNSLink record"
            );
        }

        let created = self.create_txt_record(&value).await?;
        tracing::info!(
            record_id = %created.id,
            hostname = %self.hostname,
            value = %value,
            "DNSLink record created"
        );

        for record in stale.iter().filter(|r| r.id != created.id) {
            match self.delete_record(&record.id).await {
                Ok(()) => tracing::info!(record_id = %record.id, "stale DNSLink record deleted"),
                Err(e) => tracing::warn!(
                    record_id = %record.id,
                    "failed to delete stale DNSLink record, leaving duplicate: {e}"
                ),
            }
        }
        Ok(())
    }
}

impl DnsPublisher for NetlifyPublisher {
    async fn publish(&self, cid: &ContentId) -> Result<(), ClientError> {
        self.replace_dnslink(cid).await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
