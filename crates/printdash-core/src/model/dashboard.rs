// ── Dashboard aggregate ──

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::port::PortRegistry;
use super::printer::PrinterHandle;

/// The shared view: every printer plus the port registry.
///
/// Lives behind [`DashboardState`](crate::DashboardState); consumers only
/// ever hold clones of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    pub printers: Vec<PrinterHandle>,
    pub ports: PortRegistry,
    /// When the last full poll cycle committed.
    pub last_poll: Option<DateTime<Utc>>,
}

impl Dashboard {
    pub fn new(printers: Vec<PrinterHandle>) -> Self {
        Self {
            printers,
            ports: PortRegistry::new(),
            last_poll: None,
        }
    }

    pub fn printer(&self, name: &str) -> Option<&PrinterHandle> {
        self.printers.iter().find(|p| p.name == name)
    }
}
