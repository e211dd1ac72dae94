// ── API-to-domain type conversions ──
//
// Bridges raw `printdash_api` wire types into canonical `model` types.

use printdash_api::models::{ConnectionInfo, JobInfo, PrinterStatus, Settings};

use crate::model::{ConnectionReport, ConnectionState, JobProgress, PrinterSettings, Temperature};

// ── Connection state ─────────────────────────────────────────────────

impl ConnectionState {
    /// Normalize OctoPrint's human-readable state text.
    pub fn from_octoprint(state: &str) -> Self {
        let state = state.trim();
        if state.starts_with("Error") || state.starts_with("Offline after error") {
            return Self::Error;
        }
        match state {
            "Printing" | "Printing from SD" | "Sending file to SD" | "Starting"
            | "Starting print from SD" | "Cancelling" => Self::Printing,
            "Operational"
            | "Paused"
            | "Pausing"
            | "Resuming"
            | "Finishing"
            | "Transferring file to SD" => Self::Connected,
            s if s.starts_with("Connecting")
                || s.starts_with("Opening serial")
                || s.starts_with("Detecting") =>
            {
                Self::Connecting
            }
            _ => Self::Disconnected,
        }
    }
}

// ── Settings ─────────────────────────────────────────────────────────

impl From<Settings> for PrinterSettings {
    fn from(s: Settings) -> Self {
        Self {
            display_name: s.appearance.name,
            color: Some(s.appearance.color).filter(|c| !c.is_empty()),
            webcam_url: s.webcam.and_then(|w| w.stream_url).filter(|u| !u.is_empty()),
        }
    }
}

// ── Connection ───────────────────────────────────────────────────────

impl From<ConnectionInfo> for ConnectionReport {
    fn from(info: ConnectionInfo) -> Self {
        let state = ConnectionState::from_octoprint(&info.current.state);
        // OctoPrint keeps reporting the last port after closing it.
        let selected_port = match state {
            ConnectionState::Disconnected | ConnectionState::Error => String::new(),
            _ => info.current.port.unwrap_or_default(),
        };
        Self {
            state,
            selected_port,
            available_ports: info.options.ports,
        }
    }
}

// ── Temperatures ─────────────────────────────────────────────────────

/// Flatten heater readings, skipping heaters that report nothing at all.
pub(crate) fn temperatures(status: PrinterStatus) -> Vec<Temperature> {
    status
        .temperature
        .into_iter()
        .filter(|(_, r)| r.actual.is_some() || r.target.is_some())
        .map(|(heater, r)| Temperature {
            heater,
            actual: r.actual,
            target: r.target,
        })
        .collect()
}

// ── Job ──────────────────────────────────────────────────────────────

#[allow(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn secs(value: Option<f64>) -> Option<u64> {
    value.filter(|v| v.is_finite() && *v >= 0.0).map(|v| v as u64)
}

impl From<JobInfo> for JobProgress {
    fn from(info: JobInfo) -> Self {
        Self {
            file_name: info.job.file.name,
            completion_pct: info.progress.completion,
            print_time_secs: secs(info.progress.print_time),
            print_time_left_secs: secs(info.progress.print_time_left),
        }
    }
}
