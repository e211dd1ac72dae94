use thiserror::Error;

/// Top-level error type for the `printdash-api` crate.
///
/// Covers every failure mode of a single printer host: transport,
/// authentication, printer state, and payload decoding.
/// `printdash-core` maps these into per-printer failure records.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// API key missing, wrong, or lacking permission (401/403).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Printer ─────────────────────────────────────────────────────
    /// The host answered 409: no printer is connected or it is busy.
    #[error("Printer is not operational: {message}")]
    PrinterNotOperational { message: String },

    /// Any other non-success status from the host.
    #[error("OctoPrint API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::PrinterNotOperational { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the request timed out at the HTTP layer.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}
