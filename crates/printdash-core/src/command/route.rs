// Command routing: resolve the target printer, then call its host.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::{Command, HeatLevel};
use crate::client::PrinterClient;
use crate::error::CoreError;

/// Execute `cmd` against the printer it names.
///
/// Fails with [`CoreError::PrinterNotFound`] for unknown names.
pub(crate) async fn route_command(
    clients: &IndexMap<String, Arc<dyn PrinterClient>>,
    cmd: Command,
) -> Result<(), CoreError> {
    let client = clients
        .get(cmd.printer())
        .map(Arc::as_ref)
        .ok_or_else(|| CoreError::PrinterNotFound {
            name: cmd.printer().to_owned(),
        })?;
    debug!(printer = cmd.printer(), command = %cmd, "routing command");

    match cmd {
        Command::Connect { port, .. } => client.connect(&port).await,

        Command::Preheat { level, .. } => preheat(client, level).await,

        Command::Extrude { amount_mm, .. } => client.extrude(amount_mm).await,

        Command::StartJob { .. } => client.start_job().await,

        Command::CancelJob { .. } => {
            client.cancel_job().await?;
            preheat(client, HeatLevel::Off).await
        }

        Command::MoveZ { z, .. } => client.jog_z(z).await,

        Command::PrintFile { file_name, .. } => client.print_file(&file_name).await,
    }
}

async fn preheat(client: &dyn PrinterClient, level: HeatLevel) -> Result<(), CoreError> {
    let (tool, bed) = level.targets();
    client.set_tool_target(tool).await?;
    client.set_bed_target(bed).await
}
