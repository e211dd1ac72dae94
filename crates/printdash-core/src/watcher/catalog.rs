// Full (non-incremental) catalog loading.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::store::DashboardState;

/// Names of the regular files directly inside `path`.
pub async fn list_directory(path: &Path) -> io::Result<BTreeSet<String>> {
    let mut entries = tokio::fs::read_dir(path).await?;
    let mut names = BTreeSet::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

/// Outcome of one reload across all printers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    pub reloaded: usize,
    pub failed: usize,
}

/// Re-enumerate every printer's directory and replace its catalog.
///
/// Listing happens outside the lock; a printer whose listing fails keeps
/// its previous catalog.
pub(crate) async fn reload_catalogs(state: &DashboardState) -> ReloadSummary {
    let dirs: Vec<PathBuf> = state
        .read(|d| d.printers.iter().map(|p| p.gcode_directory.clone()).collect())
        .await;

    let mut listings = Vec::with_capacity(dirs.len());
    for dir in &dirs {
        listings.push(list_directory(dir).await);
    }

    state
        .mutate(|dash| {
            let mut summary = ReloadSummary::default();
            for (printer, listing) in dash.printers.iter_mut().zip(listings) {
                match listing {
                    Ok(files) => {
                        debug!(printer = %printer.name, files = files.len(), "catalog loaded");
                        printer.file_catalog = files;
                        summary.reloaded += 1;
                    }
                    Err(e) => {
                        warn!(
                            printer = %printer.name,
                            dir = %printer.gcode_directory.display(),
                            error = %e,
                            "catalog listing failed, keeping previous catalog"
                        );
                        summary.failed += 1;
                    }
                }
            }
            summary
        })
        .await
}
