//! Deployment configuration.
//!
//! Loaded once at process start and handed to each client's constructor.
//! Endpoint URLs default to the production services and can be overridden
//! for staging or testing. Only the credentials of the selected DNS
//! provider are required.

use std::str::FromStr;
use std::time::Duration;

use url::Url;
use zeroize::Zeroizing;

use crate::retry::RetryPolicy;

/// Default Pinata API base URL.
pub const DEFAULT_PINATA_API_URL: &str = "https://api.pinata.cloud";
/// Default public IPFS gateway.
pub const DEFAULT_GATEWAY_URL: &str = "https://cloudflare-ipfs.com";
/// Default Cloudflare API base URL.
pub const DEFAULT_CLOUDFLARE_API_URL: &str = "https://api.cloudflare.com/client/v4";
/// Default Netlify API base URL.
pub const DEFAULT_NETLIFY_API_URL: &str = "https://api.netlify.com/api/v1";
/// Default label for the pin name; a random number is appended.
pub const DEFAULT_PIN_NAME_PREFIX: &str = "test-site";
/// Default TTL (seconds) of the DNSLink TXT record.
pub const DEFAULT_DNSLINK_TTL: u32 = 60;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 300;

/// Which DNS provider publishes the DNSLink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsProviderKind {
    /// Cloudflare Web3 hostname, single PATCH.
    Cloudflare,
    /// Netlify DNS zone, TXT record replace.
    Netlify,
}

impl std::fmt::Display for DnsProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cloudflare => f.write_str("cloudflare"),
            Self::Netlify => f.write_str("netlify"),
        }
    }
}

impl FromStr for DnsProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cloudflare" => Ok(Self::Cloudflare),
            "netlify" => Ok(Self::Netlify),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// Pinata pinning service settings.
#[derive(Clone)]
pub struct PinataConfig {
    pub api_url: Url,
    pub api_key: Zeroizing<String>,
    pub api_secret: Zeroizing<String>,
    pub pin_name_prefix: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for PinataConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinataConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .field("pin_name_prefix", &self.pin_name_prefix)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Public gateway polling settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub gateway_url: Url,
    pub policy: RetryPolicy,
}

/// Cloudflare Web3 hostname settings.
#[derive(Clone)]
pub struct CloudflareConfig {
    pub api_url: Url,
    pub api_key: Zeroizing<String>,
    pub zone_id: String,
    pub hostname_id: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for CloudflareConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("zone_id", &self.zone_id)
            .field("hostname_id", &self.hostname_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Netlify DNS zone settings.
#[derive(Clone)]
pub struct NetlifyConfig {
    pub api_url: Url,
    pub api_key: Zeroizing<String>,
    pub zone_id: String,
    /// Domain whose `_dnslink.` TXT record is replaced.
    pub domain: String,
    pub ttl: u32,
    pub timeout: Duration,
}

impl std::fmt::Debug for NetlifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetlifyConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("zone_id", &self.zone_id)
            .field("domain", &self.domain)
            .field("ttl", &self.ttl)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// DNS provider settings.
#[derive(Debug, Clone)]
pub enum DnsConfig {
    Cloudflare(CloudflareConfig),
    Netlify(NetlifyConfig),
}

impl DnsConfig {
    /// Provider this configuration selects.
    pub fn kind(&self) -> DnsProviderKind {
        match self {
            Self::Cloudflare(_) => DnsProviderKind::Cloudflare,
            Self::Netlify(_) => DnsProviderKind::Netlify,
        }
    }
}

/// Everything one deployment run needs.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub pinata: PinataConfig,
    pub gateway: GatewayConfig,
    pub dns: DnsConfig,
}

impl DeployConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PINATA_API_KEY`, `PINATA_API_SECRET` (required)
    /// - `SITEPIN_DNS_PROVIDER` (`cloudflare` or `netlify`, default: `cloudflare`);
    ///   ignored when `provider` is given
    /// - `CLOUDFLARE_API_KEY`, `CLOUDFLARE_ZONE_ID`, `CLOUDFLARE_HOSTNAME_ID`
    ///   (required for Cloudflare)
    /// - `NETLIFY_API_KEY`, `NETLIFY_DNS_ZONE_ID`, `DNSLINK_DOMAIN`
    ///   (required for Netlify), `NETLIFY_DNSLINK_TTL` (default: 60)
    /// - `PINATA_API_URL`, `IPFS_GATEWAY_URL`, `CLOUDFLARE_API_URL`,
    ///   `NETLIFY_API_URL` (default: production endpoints)
    /// - `SITEPIN_PIN_NAME_PREFIX` (default: `test-site`)
    /// - `SITEPIN_GATEWAY_ATTEMPTS` (default: 5),
    ///   `SITEPIN_GATEWAY_INTERVAL_MS` (default: 5000),
    ///   `SITEPIN_GATEWAY_TIMEOUT_MS` (default: the interval)
    /// - `SITEPIN_HTTP_TIMEOUT_SECS` (default: 60),
    ///   `SITEPIN_UPLOAD_TIMEOUT_SECS` (default: 300)
    pub fn from_env(provider: Option<DnsProviderKind>) -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok(), provider)
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F, provider: Option<DnsProviderKind>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let http_timeout = Duration::from_secs(env.parsed("SITEPIN_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?);

        let pinata = PinataConfig {
            api_url: env.url("PINATA_API_URL", DEFAULT_PINATA_API_URL)?,
            api_key: env.secret("PINATA_API_KEY")?,
            api_secret: env.secret("PINATA_API_SECRET")?,
            pin_name_prefix: env
                .get("SITEPIN_PIN_NAME_PREFIX")
                .unwrap_or_else(|| DEFAULT_PIN_NAME_PREFIX.to_string()),
            timeout: Duration::from_secs(
                env.parsed("SITEPIN_UPLOAD_TIMEOUT_SECS", DEFAULT_UPLOAD_TIMEOUT_SECS)?,
            ),
        };

        let interval_ms: u64 = env.parsed(
            "SITEPIN_GATEWAY_INTERVAL_MS",
            RetryPolicy::default().interval.as_millis() as u64,
        )?;
        let gateway = GatewayConfig {
            gateway_url: env.url("IPFS_GATEWAY_URL", DEFAULT_GATEWAY_URL)?,
            policy: RetryPolicy {
                attempts: env.parsed("SITEPIN_GATEWAY_ATTEMPTS", RetryPolicy::default().attempts)?,
                interval: Duration::from_millis(interval_ms),
                attempt_timeout: Duration::from_millis(env.parsed("SITEPIN_GATEWAY_TIMEOUT_MS", interval_ms)?),
            },
        };

        let kind = match provider {
            Some(kind) => kind,
            None => env
                .get("SITEPIN_DNS_PROVIDER")
                .map(|raw| raw.parse::<DnsProviderKind>())
                .transpose()?
                .unwrap_or(DnsProviderKind::Cloudflare),
        };

        let dns = match kind {
            DnsProviderKind::Cloudflare => DnsConfig::Cloudflare(CloudflareConfig {
                api_url: env.url("CLOUDFLARE_API_URL", DEFAULT_CLOUDFLARE_API_URL)?,
                api_key: env.secret("CLOUDFLARE_API_KEY")?,
                zone_id: env.required("CLOUDFLARE_ZONE_ID")?,
                hostname_id: env.required("CLOUDFLARE_HOSTNAME_ID")?,
                timeout: http_timeout,
            }),
            DnsProviderKind::Netlify => DnsConfig::Netlify(NetlifyConfig {
                api_url: env.url("NETLIFY_API_URL", DEFAULT_NETLIFY_API_URL)?,
                api_key: env.secret("NETLIFY_API_KEY")?,
                zone_id: env.required("NETLIFY_DNS_ZONE_ID")?,
                domain: env.required("DNSLINK_DOMAIN")?,
                ttl: env.parsed("NETLIFY_DNSLINK_TTL", DEFAULT_DNSLINK_TTL)?,
                timeout: http_timeout,
            }),
        };

        Ok(Self {
            pinata,
            gateway,
            dns,
        })
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn get(&self, var: &str) -> Option<String> {
        (self.0)(var).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, var: &str) -> Result<String, ConfigError> {
        self.get(var).ok_or_else(|| ConfigError::Missing(var.to_string()))
    }

    fn secret(&self, var: &str) -> Result<Zeroizing<String>, ConfigError> {
        self.required(var).map(Zeroizing::new)
    }

    fn url(&self, var: &str, default: &str) -> Result<Url, ConfigError> {
        let raw = self.get(var).unwrap_or_else(|| default.to_string());
        Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
    }

    fn parsed<T>(&self, var: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(var) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue(var.to_string(), e.to_string())),
            None => Ok(default),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(String),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
    #[error("unknown DNS provider {0:?} (expected \"cloudflare\" or \"netlify\")")]
    UnknownProvider(String),
}
