//! Long-running mode: poll, watch, and log dashboard changes until stopped.

use std::sync::Arc;

use tracing::{info, warn};

use printdash_core::{Dashboard, Fleet, FleetConfig, PrinterBinding};

use crate::error::CliError;

pub async fn handle(config: FleetConfig, bindings: Vec<PrinterBinding>) -> Result<(), CliError> {
    let fleet = Fleet::new(config, bindings)?;
    fleet.start().await?;
    info!(
        printers = fleet.printer_names().count(),
        "printdash running, press Ctrl-C to stop"
    );

    let mut stream = fleet.subscribe();
    let mut previous = Arc::clone(stream.current());

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            snapshot = stream.changed() => {
                let Some(snapshot) = snapshot else { break };
                log_changes(&previous, &snapshot);
                previous = snapshot;
            }
        }
    }

    info!("shutting down");
    fleet.shutdown().await;
    Ok(())
}

/// Log per-printer state transitions, port availability flips, and
/// catalog size changes between two snapshots.
fn log_changes(before: &Dashboard, after: &Dashboard) {
    for printer in &after.printers {
        let Some(old) = before.printer(&printer.name) else {
            continue;
        };

        if old.connection_state != printer.connection_state {
            match printer.last_error {
                Some(ref error) => warn!(
                    printer = %printer.name,
                    from = %old.connection_state,
                    to = %printer.connection_state,
                    error = %error,
                    "printer state changed"
                ),
                None => info!(
                    printer = %printer.name,
                    from = %old.connection_state,
                    to = %printer.connection_state,
                    "printer state changed"
                ),
            }
        }

        if old.file_catalog != printer.file_catalog {
            info!(
                printer = %printer.name,
                files = printer.file_catalog.len(),
                "file catalog updated"
            );
        }
    }

    for port in after.ports.iter() {
        let was = before.ports.get(&port.name, &port.host_key).map(|p| p.available);
        if was != Some(port.available) {
            info!(
                port = %port.name,
                host = %port.host_key,
                available = port.available,
                "port availability changed"
            );
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(e) => {
                warn!(error = %e, "cannot install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("shutdown signal received");
}
