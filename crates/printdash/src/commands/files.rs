//! File catalog listing.

use std::collections::BTreeSet;

use serde::Serialize;
use tabled::Tabled;

use printdash_core::{Fleet, FleetConfig, PrinterBinding};

use crate::cli::{FilesArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct FileEntry {
    printer: String,
    file: String,
}

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "Printer")]
    printer: String,
    #[tabled(rename = "File")]
    file: String,
}

impl From<&FileEntry> for FileRow {
    fn from(e: &FileEntry) -> Self {
        Self {
            printer: e.printer.clone(),
            file: e.file.clone(),
        }
    }
}

fn entries(printer: &str, catalog: &BTreeSet<String>) -> impl Iterator<Item = FileEntry> {
    catalog.iter().map(move |file| FileEntry {
        printer: printer.to_owned(),
        file: file.clone(),
    })
}

pub async fn handle(
    config: FleetConfig,
    bindings: Vec<PrinterBinding>,
    args: FilesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Catalogs are loaded by `start()`; no printer needs to be reachable.
    let dashboard = Fleet::oneshot(config, bindings, |fleet| async move {
        Ok(fleet.current_dashboard().await)
    })
    .await?;

    let rows: Vec<FileEntry> = match args.printer {
        Some(name) => {
            let printer = dashboard
                .printer(&name)
                .ok_or_else(|| CliError::PrinterNotFound { name: name.clone() })?;
            entries(&printer.name, &printer.file_catalog).collect()
        }
        None => dashboard
            .printers
            .iter()
            .flat_map(|p| entries(&p.name, &p.file_catalog))
            .collect(),
    };

    let rendered = output::render_list(
        &global.output,
        &rows,
        |e| FileRow::from(e),
        |e| e.file.clone(),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
