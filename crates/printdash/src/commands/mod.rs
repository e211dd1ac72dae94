//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod files;
pub mod printer;
pub mod run;
pub mod status;

use printdash_core::{FleetConfig, PrinterBinding};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    config: FleetConfig,
    bindings: Vec<PrinterBinding>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Run => run::handle(config, bindings).await,
        Command::Status(args) => status::handle(config, bindings, args, global).await,
        Command::Files(args) => files::handle(config, bindings, args, global).await,
        cmd => printer::handle(config, bindings, cmd, global).await,
    }
}
