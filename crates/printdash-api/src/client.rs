// OctoPrint HTTP client
//
// Wraps `reqwest::Client` with base-URL resolution, API key injection,
// and status-code mapping. Endpoint methods live in `status.rs` (reads)
// and `commands.rs` (writes) as inherent impls to keep this module focused
// on transport mechanics.

use reqwest::StatusCode;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for one OctoPrint host.
///
/// Cheap to clone: `reqwest::Client` is reference counted internally.
#[derive(Debug, Clone)]
pub struct OctoPrintClient {
    http: reqwest::Client,
    base_url: Url,
}

impl OctoPrintClient {
    /// Create a client for the host at `base_url` (e.g. `http://octopi.local`).
    pub fn new(
        base_url: Url,
        api_key: Option<&SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client(api_key)?;
        Ok(Self {
            http,
            base_url: normalize_base(base_url),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self {
            http,
            base_url: normalize_base(base_url),
        })
    }

    /// The host base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let body = check_status(resp).await?.text().await?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Send a POST command. OctoPrint answers commands with `204 No Content`
    /// (or a small JSON body that callers do not need), so the body is dropped.
    pub(crate) async fn post_command(&self, url: Url, body: &impl Serialize) -> Result<(), Error> {
        debug!("POST {}", url);

        let resp = self.http.post(url).json(body).send().await?;
        check_status(resp).await?;
        Ok(())
    }
}

/// Ensure the base URL ends with `/` so `join` appends instead of replacing
/// the last path segment (hosts behind a reverse proxy often live under a prefix).
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Map non-success statuses onto [`Error`] variants.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = resp
        .text()
        .await
        .ok()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_owned());

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Authentication { message },
        StatusCode::CONFLICT => Error::PrinterNotOperational { message },
        other => Error::Api {
            status: other.as_u16(),
            message,
        },
    })
}
