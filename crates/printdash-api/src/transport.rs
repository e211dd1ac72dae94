// Shared transport configuration for building reqwest::Client instances.
//
// Every printer host gets its own client; timeout and the API key header
// are applied here so the endpoint modules stay free of builder logic.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Header OctoPrint reads the API key from.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// When an API key is given it is attached to every request as
    /// [`API_KEY_HEADER`] and marked sensitive so it never shows in logs.
    pub fn build_client(&self, api_key: Option<&SecretString>) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(key.expose_secret()).map_err(|e| {
                Error::Authentication {
                    message: format!("API key is not a valid header value: {e}"),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("printdash/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(Error::Transport)
    }
}
