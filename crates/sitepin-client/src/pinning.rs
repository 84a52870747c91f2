//! Typed client for the Pinata pinning API.
//!
//! Base URL: `api.pinata.cloud`
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/pinning/pinFileToIPFS` | Pin a directory of files (multipart) |
//!
//! Every file is sent as a `file` part whose filename is
//! `<folder>/<relative path>`. Pinata wraps parts sharing one top-level
//! folder into a single directory, so the returned `IpfsHash` addresses the
//! whole site. Credentials travel in the `pinata_api_key` and
//! `pinata_secret_api_key` headers.
//!
//! File parts are streamed from disk; only one read buffer per file is held
//! while the request body is sent.
//!
//! The upload is never retried: each accepted request creates a new pin.

use rand::Rng;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::{Deserialize, Serialize};
use sitepin_core::{AssetSet, ContentId};
use tokio_util::io::ReaderStream;

use crate::config::{ConfigError, PinataConfig};
use crate::error::ClientError;
use crate::http;

const PIN_FILE_PATH: &str = "pinning/pinFileToIPFS";
const ENDPOINT: &str = "POST /pinning/pinFileToIPFS";

/// Exclusive upper bound of the random pin-name suffix.
const PIN_NAME_SUFFIX_RANGE: u32 = 1_000_000;

/// Response of `pinFileToIPFS`.
///
/// Every field is optional so that a 2xx response without a CID decodes
/// and is reported as [`ClientError::MissingCid`] rather than a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PinFileResponse {
    #[serde(rename = "IpfsHash", default)]
    pub ipfs_hash: Option<String>,
    #[serde(rename = "PinSize", default)]
    pub pin_size: Option<u64>,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<String>,
    #[serde(rename = "isDuplicate", default)]
    pub is_duplicate: Option<bool>,
}

/// `pinataMetadata` multipart field.
#[derive(Debug, Serialize)]
struct PinataMetadata<'a> {
    name: &'a str,
}

/// Client for the Pinata pinning API.
#[derive(Debug, Clone)]
pub struct PinningClient {
    http: reqwest::Client,
    url: String,
    pin_name_prefix: String,
}

impl PinningClient {
    /// Create a new pinning client from configuration.
    pub fn new(config: &PinataConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        for (name, var, value) in [
            ("pinata_api_key", "PINATA_API_KEY", config.api_key.as_str()),
            ("pinata_secret_api_key", "PINATA_API_SECRET", config.api_secret.as_str()),
        ] {
            let mut value = HeaderValue::from_str(value).map_err(|_| {
                ConfigError::InvalidValue(var.to_string(), "invalid API key characters".into())
            })?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(name), value);
        }

        Ok(Self {
            http: http::build_client(config.timeout, headers)?,
            url: http::endpoint_url(&config.api_url, PIN_FILE_PATH),
            pin_name_prefix: config.pin_name_prefix.clone(),
        })
    }

    /// Upload every file of `assets` as one pinned directory.
    ///
    /// Calls `POST {api_url}/pinning/pinFileToIPFS`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Io`] if a file cannot be read.
    /// - [`ClientError::Http`] / [`ClientError::Api`] on transport failure or
    ///   a non-2xx status.
    /// - [`ClientError::MissingCid`] if the upload was accepted but the
    ///   response carries no `IpfsHash`.
    pub async fn pin_directory(&self, assets: &AssetSet) -> Result<ContentId, ClientError> {
        let pin_name = self.pin_name();
        let form = self.build_form(assets, &pin_name).await?;

        tracing::info!(files = assets.len(), pin_name = %pin_name, "uploading assets to Pinata");

        let resp = http::send(self.http.post(&self.url).multipart(form), ENDPOINT).await?;
        let resp = http::ensure_success(resp, ENDPOINT).await?;
        let body = http::read_body(resp, ENDPOINT).await?;
        let parsed: PinFileResponse = http::decode(&body, ENDPOINT)?;

        let cid = parsed
            .ipfs_hash
            .as_deref()
            .and_then(|hash| ContentId::new(hash).ok())
            .ok_or_else(|| ClientError::MissingCid { body: body.clone() })?;

        tracing::info!(
            cid = %cid,
            pin_size = ?parsed.pin_size,
            duplicate = parsed.is_duplicate.unwrap_or(false),
            "assets pinned"
        );
        Ok(cid)
    }

    /// `<prefix><n>` with `n` uniform in `[0, 1_000_000)`.
    fn pin_name(&self) -> String {
        let suffix = rand::thread_rng().gen_range(0..PIN_NAME_SUFFIX_RANGE);
        format!("{}{suffix}", self.pin_name_prefix)
    }

    async fn build_form(&self, assets: &AssetSet, pin_name: &str) -> Result<Form, ClientError> {
        // Filenames carry `/`; path-segment encoding would turn them into
        // `filename*=` parameters that Pinata does not read as folders.
        let mut form = Form::new().percent_encode_noop();
        for entry in assets.files() {
            let io_err = |source| ClientError::Io {
                path: entry.absolute.clone(),
                source,
            };
            let file = tokio::fs::File::open(&entry.absolute).await.map_err(io_err)?;
            let len = file.metadata().await.map_err(io_err)?.len();
            let file_name = format!("{}/{}", assets.folder_name(), entry.relative);
            tracing::debug!(file = %file_name, bytes = len, "adding file part");
            let body = Body::wrap_stream(ReaderStream::new(file));
            form = form.part("file", Part::stream_with_length(body, len).file_name(file_name));
        }

        let metadata = serde_json::to_string(&PinataMetadata { name: pin_name }).map_err(|e| {
            ClientError::Encode {
                endpoint: ENDPOINT.into(),
                reason: e.to_string(),
            }
        })?;
        Ok(form.text("pinataMetadata", metadata))
    }
}
