// ── Core error types ──
//
// User-facing errors from printdash-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the `From<printdash_api::Error>`
// impl translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Printer host errors ──────────────────────────────────────────
    #[error("Cannot reach printer host at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Printer is not operational: {message}")]
    NotOperational { message: String },

    #[error("Printer request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Fleet errors ─────────────────────────────────────────────────
    #[error("Printer not found: {name}")]
    PrinterNotFound { name: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Cannot watch directory {path}: {message}")]
    WatchSetup { path: String, message: String },

    #[error("Fleet is not running")]
    NotRunning,

    #[error("Fleet is already started")]
    AlreadyStarted,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build a [`CoreError::Timeout`] from the elapsed budget.
    pub(crate) fn timeout(budget: std::time::Duration) -> Self {
        Self::Timeout {
            timeout_ms: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<printdash_api::Error> for CoreError {
    fn from(err: printdash_api::Error) -> Self {
        match err {
            printdash_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            printdash_api::Error::PrinterNotOperational { message } => {
                CoreError::NotOperational { message }
            }
            printdash_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_ms: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            printdash_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            printdash_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            printdash_api::Error::Deserialization { message, body: _ } => {
                CoreError::Api {
                    message: format!("malformed response: {message}"),
                    status: None,
                }
            }
        }
    }
}
