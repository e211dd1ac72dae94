//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use printdash_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const WATCH: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Printer hosts ────────────────────────────────────────────────
    #[error("Could not reach printer host at {url}")]
    #[diagnostic(
        code(printdash::connection_failed),
        help(
            "Check that OctoPrint is running and reachable.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(printdash::auth_failed),
        help("Verify the printer's api_key or api_key_env in the printer list.")
    )]
    AuthFailed { message: String },

    #[error("API key for printer '{printer}' not found in ${env}")]
    #[diagnostic(
        code(printdash::no_credentials),
        help("Export {env}, or set api_key for this printer in the printer list.")
    )]
    NoCredentials { printer: String, env: String },

    #[error("Printer is not operational: {message}")]
    #[diagnostic(
        code(printdash::not_operational),
        help("Connect the printer first: printdash connect <printer> <port>")
    )]
    NotOperational { message: String },

    #[error("Request timed out after {millis}ms")]
    #[diagnostic(
        code(printdash::timeout),
        help("Raise fetch_timeout_ms / request_timeout_secs or check the host.")
    )]
    Timeout { millis: u64 },

    #[error("API error: {message}")]
    #[diagnostic(code(printdash::api_error))]
    ApiError { message: String },

    // ── Fleet ────────────────────────────────────────────────────────
    #[error("Printer '{name}' not found")]
    #[diagnostic(
        code(printdash::not_found),
        help("Run: printdash status to see configured printers")
    )]
    PrinterNotFound { name: String },

    #[error("Cannot watch {path}")]
    #[diagnostic(
        code(printdash::watch_setup),
        help("Make sure every gcode_dir in the printer list exists and is readable.")
    )]
    WatchSetup {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(printdash::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Printer list not found at {path}")]
    #[diagnostic(
        code(printdash::no_printer_list),
        help("Pass --printers <FILE> or set PRINTDASH_PRINTERS.")
    )]
    NoPrinterList { path: String },

    #[error("Invalid printer list {path}")]
    #[diagnostic(code(printdash::printer_list))]
    PrinterList {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Settings file not found at {path}")]
    #[diagnostic(code(printdash::no_config))]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(printdash::config))]
    Config(Box<figment::Error>),

    #[error("{0}")]
    #[diagnostic(code(printdash::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::PrinterNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::WatchSetup { .. } => exit_code::WATCH,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::NotOperational { message } => CliError::NotOperational { message },

            CoreError::Timeout { timeout_ms } => CliError::Timeout { millis: timeout_ms },

            CoreError::Api { message, status } => CliError::ApiError {
                message: match status {
                    Some(status) => format!("{message} (HTTP {status})"),
                    None => message,
                },
            },

            CoreError::PrinterNotFound { name } => CliError::PrinterNotFound { name },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::WatchSetup { path, message } => CliError::WatchSetup {
                path,
                source: message.into(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "printer list".into(),
                reason: message,
            },

            CoreError::NotRunning => CliError::Internal("fleet is not running".into()),

            CoreError::AlreadyStarted => CliError::Internal("fleet is already started".into()),

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}
