// OctoPrint wire types
//
// Only the fields the dashboard consumes are modeled; everything else the
// host sends is ignored by serde. Optional numbers stay `Option` because
// OctoPrint reports `null` for sensors and estimates it does not have.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── /api/settings ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub appearance: Appearance,
    #[serde(default)]
    pub webcam: Option<Webcam>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Appearance {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Webcam {
    #[serde(default)]
    pub stream_url: Option<String>,
}

// ── /api/connection ──────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionInfo {
    pub current: CurrentConnection,
    #[serde(default)]
    pub options: ConnectionOptions,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConnection {
    pub state: String,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub baudrate: Option<u32>,
    #[serde(default)]
    pub printer_profile: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConnectionOptions {
    #[serde(default)]
    pub ports: Vec<String>,
    #[serde(default)]
    pub baudrates: Vec<u32>,
}

// ── /api/printer ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PrinterStatus {
    /// Heater name (`tool0`, `bed`, `chamber`, ...) to its reading.
    #[serde(default)]
    pub temperature: BTreeMap<String, TemperatureReading>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct TemperatureReading {
    #[serde(default)]
    pub actual: Option<f64>,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub offset: Option<f64>,
}

// ── /api/job ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JobInfo {
    #[serde(default)]
    pub job: Job,
    #[serde(default)]
    pub progress: Progress,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default)]
    pub file: JobFile,
    #[serde(default)]
    pub estimated_print_time: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JobFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    #[serde(default)]
    pub completion: Option<f64>,
    #[serde(default)]
    pub print_time: Option<f64>,
    #[serde(default)]
    pub print_time_left: Option<f64>,
}
