// ── Domain model ──
//
// Canonical types for the dashboard. Wire shapes from the printer hosts
// are converted into these in `convert.rs`.

pub mod dashboard;
pub mod port;
pub mod printer;

pub use dashboard::Dashboard;
pub use port::{Port, PortRegistry};
pub use printer::{
    ConnectionReport, ConnectionState, JobProgress, PrinterHandle, PrinterSettings, Temperature,
};
