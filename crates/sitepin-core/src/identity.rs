//! # Content Identifier Newtypes
//!
//! `ContentId` wraps the opaque CID string computed by the pinning service.
//! It is never computed locally and never mutated once obtained; the only
//! check performed is that it is non-empty.
//!
//! `DnsLink` renders a CID in the two shapes DNS providers expect: the bare
//! `/ipfs/<cid>` path and the `dnslink=/ipfs/<cid>` TXT record value.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Prefix of a DNSLink TXT record value.
pub const DNSLINK_TXT_PREFIX: &str = "dnslink=";

/// Label under which DNSLink TXT records live (`_dnslink.<domain>`).
pub const DNSLINK_LABEL: &str = "_dnslink";

/// Opaque IPFS content identifier returned by the pinning service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    /// Wrap a CID string, rejecting empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidContentId(raw));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Access the CID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The DNSLink pointing at this CID.
    pub fn dnslink(&self) -> DnsLink {
        DnsLink(self.clone())
    }
}

impl TryFrom<String> for ContentId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContentId> for String {
    fn from(cid: ContentId) -> Self {
        cid.0
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A DNSLink to immutable IPFS content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnsLink(ContentId);

impl DnsLink {
    /// The CID this link points at.
    pub fn cid(&self) -> &ContentId {
        &self.0
    }

    /// Content path, e.g. `/ipfs/bafy...`.
    pub fn path(&self) -> String {
        format!("/ipfs/{}", self.0)
    }

    /// TXT record value, e.g. `dnslink=/ipfs/bafy...`.
    pub fn txt_value(&self) -> String {
        format!("{DNSLINK_TXT_PREFIX}{}", self.path())
    }

    /// Parse a TXT record value of the form `dnslink=/ipfs/<cid>`.
    ///
    /// Surrounding quotes are tolerated since some providers return TXT
    /// values quoted. Returns `None` for anything that is not an IPFS DNSLink.
    pub fn from_txt_value(value: &str) -> Option<Self> {
        let value = value.trim().trim_matches('"');
        let cid = value.strip_prefix(DNSLINK_TXT_PREFIX)?.strip_prefix("/ipfs/")?;
        ContentId::new(cid.trim_end_matches('/')).ok().map(Self)
    }

    /// The DNSLink hostname for a domain, e.g. `_dnslink.example.com`.
    pub fn hostname_for(domain: &str) -> String {
        format!("{DNSLINK_LABEL}.{}", domain.trim_end_matches('.'))
    }
}

impl std::fmt::Display for DnsLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/ipfs/{}", self.0)
    }
}
