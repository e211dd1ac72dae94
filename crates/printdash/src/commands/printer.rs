//! Printer command handlers: connect, preheat, extrude, job, move-z, print.

use printdash_core::{Command as CoreCommand, Fleet, FleetConfig, HeatLevel, PrinterBinding};

use crate::cli::{Command, GlobalOpts, JobCommand};
use crate::error::CliError;

/// Translate a CLI command into the core command it sends.
fn to_core(cmd: Command) -> Result<CoreCommand, CliError> {
    Ok(match cmd {
        Command::Connect { printer, port } => CoreCommand::Connect { printer, port },
        Command::Preheat { printer, level } => CoreCommand::Preheat {
            printer,
            level: HeatLevel::try_from(level)?,
        },
        Command::Extrude { printer, amount } => CoreCommand::Extrude {
            printer,
            amount_mm: amount,
        },
        Command::Job(args) => match args.command {
            JobCommand::Start { printer } => CoreCommand::StartJob { printer },
            JobCommand::Cancel { printer } => CoreCommand::CancelJob { printer },
        },
        Command::MoveZ { printer, z } => CoreCommand::MoveZ { printer, z },
        Command::Print { printer, file } => CoreCommand::PrintFile {
            printer,
            file_name: file,
        },
        other => {
            return Err(CliError::Internal(format!(
                "{other:?} is not a printer command"
            )));
        }
    })
}

pub async fn handle(
    config: FleetConfig,
    bindings: Vec<PrinterBinding>,
    cmd: Command,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let command = to_core(cmd)?;
    let summary = format!("{}: {command}", command.printer());

    Fleet::oneshot(config, bindings, |fleet| async move {
        fleet.execute(command).await
    })
    .await?;

    if !global.quiet {
        eprintln!("{summary}");
    }
    Ok(())
}
