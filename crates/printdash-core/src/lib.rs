// printdash-core: Fleet state between printdash-api and consumers (CLI/daemon).

pub mod client;
pub mod command;
pub mod config;
pub mod convert;
pub mod error;
pub mod fleet;
pub mod model;
pub mod poller;
pub mod store;
pub mod stream;
pub mod watcher;

// ── Primary re-exports ──────────────────────────────────────────────
pub use client::PrinterClient;
pub use command::{Command, DEFAULT_EXTRUDE_MM, HeatLevel};
pub use config::FleetConfig;
pub use error::CoreError;
pub use fleet::{Fleet, PrinterBinding};
pub use poller::CycleSummary;
pub use store::DashboardState;
pub use stream::{DashboardStream, DashboardWatchStream};
pub use watcher::{CatalogWatcher, ReloadSummary, WatchEvent, WatchPhase};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ConnectionReport, ConnectionState, Dashboard, JobProgress, Port, PortRegistry, PrinterHandle,
    PrinterSettings, Temperature,
};
