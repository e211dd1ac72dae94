// File watch coordinator
//
// Idle → (initial load) → Watching → (write event) → Reloading → Watching.
// Any write in any watched directory reloads every printer's catalog.
// Events are handled one at a time, so reloads never overlap.

use std::path::PathBuf;
use std::sync::Arc;

use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use strum::Display;
use tokio::sync::{Mutex, mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::catalog::{ReloadSummary, reload_catalogs};
use crate::error::CoreError;
use crate::store::DashboardState;

const WATCH_CHANNEL_SIZE: usize = 64;

/// Item delivered by the filesystem notification backend.
pub type WatchEvent = notify::Result<notify::Event>;

/// Coordinator lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum WatchPhase {
    Idle,
    Watching,
    Reloading,
}

/// Whether a notification is a write to file contents.
pub fn is_write_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any)
    )
}

/// Keeps every printer's file catalog current.
pub struct CatalogWatcher {
    state: Arc<DashboardState>,
    /// Serializes reloads so an older listing never commits last.
    reload_lock: Mutex<()>,
    phase: watch::Sender<WatchPhase>,
    reloads: watch::Sender<u64>,
}

impl CatalogWatcher {
    pub fn new(state: Arc<DashboardState>) -> Self {
        let (phase, _) = watch::channel(WatchPhase::Idle);
        let (reloads, _) = watch::channel(0);
        Self {
            state,
            reload_lock: Mutex::new(()),
            phase,
            reloads,
        }
    }

    /// Subscribe to phase transitions.
    pub fn phase(&self) -> watch::Receiver<WatchPhase> {
        self.phase.subscribe()
    }

    /// Subscribe to the count of completed event-triggered reloads.
    pub fn reloads(&self) -> watch::Receiver<u64> {
        self.reloads.subscribe()
    }

    /// Load every catalog from scratch.
    pub async fn reload(&self) -> ReloadSummary {
        let _guard = self.reload_lock.lock().await;
        reload_catalogs(&self.state).await
    }

    /// Watch every printer's directory.
    ///
    /// The returned watcher must be kept alive for as long as events are
    /// wanted; dropping it closes the receiver. Failure to watch any
    /// directory is fatal for the coordinator.
    pub async fn establish(
        &self,
    ) -> Result<(RecommendedWatcher, mpsc::Receiver<WatchEvent>), CoreError> {
        let (tx, rx) = mpsc::channel(WATCH_CHANNEL_SIZE);
        let mut watcher = notify::recommended_watcher(move |event: WatchEvent| {
            // Only reload triggers and errors are queued, so a full queue
            // already holds a pending reload.
            let trigger = match &event {
                Ok(e) => is_write_event(&e.kind),
                Err(_) => true,
            };
            if trigger {
                let _ = tx.try_send(event);
            }
        })
        .map_err(|e| CoreError::WatchSetup {
            path: String::new(),
            message: e.to_string(),
        })?;

        let dirs: Vec<PathBuf> = self
            .state
            .read(|d| d.printers.iter().map(|p| p.gcode_directory.clone()).collect())
            .await;
        for dir in &dirs {
            info!(dir = %dir.display(), "watching directory");
            watcher
                .watch(dir, RecursiveMode::NonRecursive)
                .map_err(|e| CoreError::WatchSetup {
                    path: dir.display().to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok((watcher, rx))
    }

    /// Consume notifications until cancelled or the backend goes away.
    pub async fn run(&self, mut events: mpsc::Receiver<WatchEvent>, cancel: CancellationToken) {
        self.phase.send_replace(WatchPhase::Watching);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                event = events.recv() => {
                    let Some(event) = event else { break };
                    match event {
                        Ok(event) if is_write_event(&event.kind) => {
                            debug!(paths = ?event.paths, "write detected, reloading all catalogs");
                            self.phase.send_replace(WatchPhase::Reloading);
                            let summary = self.reload().await;
                            self.reloads.send_modify(|n| *n += 1);
                            self.phase.send_replace(WatchPhase::Watching);
                            debug!(
                                reloaded = summary.reloaded,
                                failed = summary.failed,
                                "catalog reload complete"
                            );
                        }
                        Ok(_) => {}
                        Err(e) => warn!(error = %e, "file watch error"),
                    }
                }
            }
        }

        self.phase.send_replace(WatchPhase::Idle);
        debug!("catalog watcher stopped");
    }
}
