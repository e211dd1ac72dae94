// ── Runtime fleet configuration ──
//
// These types describe *how* the fleet runs: cadence, timeouts, and which
// background loops to start. They never touch disk; the binary builds a
// `FleetConfig` from its config files and hands it in.

use std::time::Duration;

/// Configuration for a [`Fleet`](crate::Fleet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetConfig {
    /// Period of the status poll loop. `Duration::ZERO` disables the loop.
    pub poll_interval: Duration,
    /// Budget for one printer's status fetch (and for its job fetch).
    /// A fetch that exceeds it is recorded as that printer's failure.
    pub fetch_timeout: Duration,
    /// How long [`Fleet::shutdown`](crate::Fleet::shutdown) waits for
    /// background tasks before aborting them.
    pub shutdown_grace: Duration,
    /// Start the file watch coordinator.
    pub watch_files: bool,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            fetch_timeout: Duration::from_secs(5),
            shutdown_grace: Duration::from_secs(3),
            watch_files: true,
        }
    }
}
