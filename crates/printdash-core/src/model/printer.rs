// ── Printer domain types ──

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Printer connection state, normalized from the host's free-form state text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Printing,
    Error,
}

impl ConnectionState {
    pub fn is_printing(self) -> bool {
        matches!(self, Self::Printing)
    }
}

/// Identity and appearance read from the host's settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrinterSettings {
    pub display_name: String,
    pub color: Option<String>,
    pub webcam_url: Option<String>,
}

/// What a host reports about its serial link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionReport {
    pub state: ConnectionState,
    /// Port currently in use, empty when not connected.
    pub selected_port: String,
    /// Ports the host can see, in the order reported.
    pub available_ports: Vec<String>,
}

/// One heater reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub heater: String,
    pub actual: Option<f64>,
    pub target: Option<f64>,
}

/// Progress of the running job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobProgress {
    pub file_name: Option<String>,
    pub completion_pct: Option<f64>,
    pub print_time_secs: Option<u64>,
    pub print_time_left_secs: Option<u64>,
}

/// In-memory state of one managed printer.
///
/// The set of handles is fixed at startup. Status fields are written only
/// by the poller; `file_catalog` only by the catalog watcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterHandle {
    /// Unique key.
    pub name: String,
    /// Identifies the physical host the printer's ports belong to.
    pub host_key: String,
    pub connection_state: ConnectionState,
    pub selected_port: String,
    pub available_ports: Vec<String>,
    pub gcode_directory: PathBuf,
    pub file_catalog: BTreeSet<String>,
    pub settings: Option<PrinterSettings>,
    pub temperatures: Vec<Temperature>,
    pub job: Option<JobProgress>,
    /// Most recent isolated failure, cleared by the next good fetch.
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl PrinterHandle {
    pub fn new(
        name: impl Into<String>,
        host_key: impl Into<String>,
        gcode_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            host_key: host_key.into(),
            connection_state: ConnectionState::Disconnected,
            selected_port: String::new(),
            available_ports: Vec::new(),
            gcode_directory: gcode_directory.into(),
            file_catalog: BTreeSet::new(),
            settings: None,
            temperatures: Vec::new(),
            job: None,
            last_error: None,
            last_updated: None,
        }
    }
}
