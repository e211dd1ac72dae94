// ── Status poller ──
//
// One poll cycle: fetch every printer's status concurrently, join, fold
// the results and reconcile ports in a single critical section, then fetch
// job info for printers that are printing. A failed or stuck printer only
// affects its own handle.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::client::PrinterClient;
use crate::error::CoreError;
use crate::model::{ConnectionReport, ConnectionState, PrinterHandle, PrinterSettings, Temperature};
use crate::store::DashboardState;

/// Everything one printer reported in the fetch phase.
#[derive(Debug)]
struct StatusReport {
    settings: PrinterSettings,
    connection: ConnectionReport,
    temperatures: Vec<Temperature>,
}

/// Outcome counters for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub polled: usize,
    pub failed: usize,
    pub printing: usize,
}

/// Run one full poll cycle.
///
/// `clients` must be in the same order as the dashboard's printers; the
/// fleet guarantees this since both are fixed at construction.
pub(crate) async fn poll_cycle(
    state: &DashboardState,
    clients: &[Arc<dyn PrinterClient>],
    fetch_timeout: Duration,
) -> CycleSummary {
    // ── Fetch (concurrent, isolated) ─────────────────────────────────
    let tasks = clients.iter().map(|client| {
        let client = Arc::clone(client);
        tokio::spawn(async move { fetch_status(client.as_ref(), fetch_timeout).await })
    });
    let reports: Vec<Result<StatusReport, CoreError>> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| {
            joined.unwrap_or_else(|e| Err(CoreError::Internal(format!("status task failed: {e}"))))
        })
        .collect();

    // ── Apply + reconcile (one critical section) ─────────────────────
    let (mut summary, printing) = state
        .mutate(|dash| {
            let mut summary = CycleSummary::default();
            let now = Utc::now();
            for (printer, report) in dash.printers.iter_mut().zip(reports) {
                summary.polled += 1;
                match report {
                    Ok(report) => apply_report(printer, report),
                    Err(e) => {
                        summary.failed += 1;
                        warn!(printer = %printer.name, error = %e, "status fetch failed");
                        record_failure(printer, &e);
                    }
                }
                printer.last_updated = Some(now);
            }
            dash.ports.reconcile_all(dash.printers.iter());
            dash.last_poll = Some(now);

            let printing: Vec<usize> = dash
                .printers
                .iter()
                .enumerate()
                .filter(|(_, p)| p.connection_state.is_printing())
                .map(|(i, _)| i)
                .collect();
            (summary, printing)
        })
        .await;

    // ── Job info for printing printers, in printer order ─────────────
    summary.printing = printing.len();
    for index in printing {
        let Some(client) = clients.get(index) else {
            continue;
        };
        let result = with_timeout(fetch_timeout, client.job_info()).await;
        state
            .mutate(|dash| {
                let Some(printer) = dash.printers.get_mut(index) else {
                    return;
                };
                match result {
                    Ok(job) => printer.job = Some(job),
                    Err(e) => {
                        warn!(printer = %printer.name, error = %e, "job fetch failed");
                        printer.last_error = Some(e.to_string());
                    }
                }
            })
            .await;
    }

    debug!(
        polled = summary.polled,
        failed = summary.failed,
        printing = summary.printing,
        "poll cycle complete"
    );
    summary
}

/// Settings, connection, and temperatures for one printer, bounded by `budget`.
async fn fetch_status(
    client: &dyn PrinterClient,
    budget: Duration,
) -> Result<StatusReport, CoreError> {
    with_timeout(budget, async {
        let (settings, connection, temperatures) = tokio::try_join!(
            client.settings(),
            client.connection_info(),
            client.temperature_info(),
        )?;
        Ok(StatusReport {
            settings,
            connection,
            temperatures,
        })
    })
    .await
}

async fn with_timeout<T>(
    budget: Duration,
    fut: impl Future<Output = Result<T, CoreError>>,
) -> Result<T, CoreError> {
    tokio::time::timeout(budget, fut)
        .await
        .unwrap_or_else(|_| Err(CoreError::timeout(budget)))
}

fn apply_report(printer: &mut PrinterHandle, report: StatusReport) {
    printer.settings = Some(report.settings);
    printer.connection_state = report.connection.state;
    printer.selected_port = report.connection.selected_port;
    printer.available_ports = report.connection.available_ports;
    printer.temperatures = report.temperatures;
    printer.last_error = None;
    if !printer.connection_state.is_printing() {
        printer.job = None;
    }
}

/// Keep last-known ports and selection so a flaky host does not free a
/// port it is still holding.
fn record_failure(printer: &mut PrinterHandle, error: &CoreError) {
    printer.connection_state = ConnectionState::Error;
    printer.last_error = Some(error.to_string());
    printer.temperatures.clear();
    printer.job = None;
}
