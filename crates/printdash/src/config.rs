//! Configuration loading for the binary.
//!
//! Two sources: the printer list (YAML, shared with the rest of the
//! print-simple tooling) and daemon settings layered by figment from
//! defaults, an optional TOML file, and `PRINTDASH_*` environment variables.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

use printdash_api::{OctoPrintClient, TransportConfig};
use printdash_core::{FleetConfig, PrinterBinding, PrinterClient};

use crate::error::CliError;

// ── Printer list ────────────────────────────────────────────────────

/// One entry of the printer list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PrinterEntry {
    /// Unique printer name used to address commands.
    pub name: String,
    /// Physical host the printer's serial ports belong to.
    pub host_key: String,
    /// OctoPrint base URL.
    pub url: String,
    /// API key (plaintext, prefer `api_key_env`).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Directory holding this printer's G-code files.
    pub gcode_dir: PathBuf,
}

/// Read and validate the printer list at `path`.
pub fn load_printers(path: &Path) -> Result<Vec<PrinterEntry>, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CliError::NoPrinterList {
            path: path.display().to_string(),
        },
        _ => CliError::Io(e),
    })?;
    let printers = parse_printers(&text).map_err(|source| CliError::PrinterList {
        path: path.display().to_string(),
        source,
    })?;
    validate_printers(&printers)?;
    debug!(path = %path.display(), count = printers.len(), "printer list loaded");
    Ok(printers)
}

fn parse_printers(text: &str) -> Result<Vec<PrinterEntry>, serde_yaml::Error> {
    // An empty document is an empty fleet.
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yaml::from_str(text)
}

fn validate_printers(printers: &[PrinterEntry]) -> Result<(), CliError> {
    let mut seen = HashSet::new();
    for printer in printers {
        if printer.name.trim().is_empty() {
            return Err(CliError::Validation {
                field: "name".into(),
                reason: "printer name must not be empty".into(),
            });
        }
        if !seen.insert(printer.name.as_str()) {
            return Err(CliError::Validation {
                field: "name".into(),
                reason: format!("printer '{}' is listed more than once", printer.name),
            });
        }
    }
    Ok(())
}

/// API key for `entry`: `api_key_env` first, then the plaintext key.
fn resolve_api_key(entry: &PrinterEntry) -> Result<Option<SecretString>, CliError> {
    if let Some(ref env_name) = entry.api_key_env {
        return match std::env::var(env_name) {
            Ok(val) => Ok(Some(SecretString::from(val))),
            Err(_) if entry.api_key.is_some() => {
                Ok(entry.api_key.clone().map(SecretString::from))
            }
            Err(_) => Err(CliError::NoCredentials {
                printer: entry.name.clone(),
                env: env_name.clone(),
            }),
        };
    }
    Ok(entry.api_key.clone().map(SecretString::from))
}

/// Build one HTTP-backed binding per printer.
pub fn build_bindings(
    printers: &[PrinterEntry],
    transport: &TransportConfig,
) -> Result<Vec<PrinterBinding>, CliError> {
    printers
        .iter()
        .map(|entry| -> Result<PrinterBinding, CliError> {
            let url: url::Url = entry.url.parse().map_err(|_| CliError::Validation {
                field: format!("{}.url", entry.name),
                reason: format!("invalid URL: {}", entry.url),
            })?;
            let api_key = resolve_api_key(entry)?;
            let client = OctoPrintClient::new(url, api_key.as_ref(), transport)
                .map_err(printdash_core::CoreError::from)?;
            Ok(PrinterBinding {
                name: entry.name.clone(),
                host_key: entry.host_key.clone(),
                gcode_directory: entry.gcode_dir.clone(),
                client: Arc::new(client) as Arc<dyn PrinterClient>,
            })
        })
        .collect()
}

// ── Daemon settings ─────────────────────────────────────────────────

/// Runtime knobs for the poller, watcher, and HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub poll_interval_ms: u64,
    pub fetch_timeout_ms: u64,
    pub request_timeout_secs: u64,
    pub shutdown_grace_ms: u64,
    pub watch_files: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            fetch_timeout_ms: 5000,
            request_timeout_secs: 10,
            shutdown_grace_ms: 3000,
            watch_files: true,
        }
    }
}

const SETTINGS_KEYS: [&str; 5] = [
    "poll_interval_ms",
    "fetch_timeout_ms",
    "request_timeout_secs",
    "shutdown_grace_ms",
    "watch_files",
];

impl Settings {
    pub fn fleet_config(&self) -> FleetConfig {
        FleetConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            fetch_timeout: Duration::from_millis(self.fetch_timeout_ms),
            shutdown_grace: Duration::from_millis(self.shutdown_grace_ms),
            watch_files: self.watch_files,
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Resolve the default settings path via XDG / platform conventions.
pub fn settings_path() -> PathBuf {
    ProjectDirs::from("org", "print-simple", "printdash").map_or_else(
        || PathBuf::from("printdash.toml"),
        |dirs| dirs.config_dir().join("printdash.toml"),
    )
}

/// Load settings from defaults, the TOML file, and the environment.
///
/// An explicitly given file must exist; the default one is optional.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, CliError> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(CliError::NoConfig {
                path: path.display().to_string(),
            });
        }
        Some(path) => path.to_path_buf(),
        None => settings_path(),
    };

    let settings: Settings = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("PRINTDASH_").only(&SETTINGS_KEYS))
        .extract()?;

    if settings.fetch_timeout_ms == 0 {
        return Err(CliError::Validation {
            field: "fetch_timeout_ms".into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(settings)
}
