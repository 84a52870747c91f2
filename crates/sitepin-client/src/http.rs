//! Shared request plumbing: client construction, endpoint joining, and
//! consistent mapping of transport failures and non-2xx statuses.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use url::Url;

use crate::config::ConfigError;
use crate::error::ClientError;

/// Build a `reqwest::Client` with a request timeout and default headers.
pub(crate) fn build_client(timeout: Duration, headers: HeaderMap) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
        .map_err(|e| ClientError::Http {
            endpoint: "client_init".into(),
            source: e,
        })
}

/// `Authorization: Bearer <token>` header map.
pub(crate) fn bearer_headers(var: &str, token: &str) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
        ConfigError::InvalidValue(var.to_string(), "invalid API key characters".into())
    })?;
    value.set_sensitive(true);
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Join a base URL and a relative path without doubling slashes.
pub(crate) fn endpoint_url(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Send a request, mapping transport failures to [`ClientError::Http`].
pub(crate) async fn send(
    request: reqwest::RequestBuilder,
    endpoint: &str,
) -> Result<reqwest::Response, ClientError> {
    request.send().await.map_err(|e| ClientError::Http {
        endpoint: endpoint.to_string(),
        source: e,
    })
}

/// Pass 2xx responses through; turn anything else into [`ClientError::Api`].
pub(crate) async fn ensure_success(
    resp: reqwest::Response,
    endpoint: &str,
) -> Result<reqwest::Response, ClientError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Api {
        endpoint: endpoint.to_string(),
        status,
        body,
    })
}

/// Read the full response body as text.
pub(crate) async fn read_body(resp: reqwest::Response, endpoint: &str) -> Result<String, ClientError> {
    resp.text().await.map_err(|e| ClientError::Http {
        endpoint: endpoint.to_string(),
        source: e,
    })
}

/// Decode a JSON body into `T`, keeping the endpoint for diagnostics.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(body: &str, endpoint: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Decode {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}
