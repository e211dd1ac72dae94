// ── Central dashboard state ──
//
// One exclusive lock guards the whole `Dashboard`: printer status fields,
// file catalogs, and the port registry. Every committed mutation publishes
// an immutable snapshot to `watch` subscribers while the lock is held.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use crate::model::{Dashboard, PrinterHandle};
use crate::stream::DashboardStream;

/// Shared source of truth for the fleet.
///
/// Writers go through [`mutate`](Self::mutate); readers either take the
/// lock for a fresh copy ([`current_dashboard`](Self::current_dashboard))
/// or read the last published snapshot without blocking
/// ([`latest`](Self::latest)). Both see only whole committed states.
pub struct DashboardState {
    dashboard: Mutex<Dashboard>,
    snapshot: watch::Sender<Arc<Dashboard>>,
}

impl DashboardState {
    pub fn new(printers: Vec<PrinterHandle>) -> Self {
        let dashboard = Dashboard::new(printers);
        let (snapshot, _) = watch::channel(Arc::new(dashboard.clone()));

        Self {
            dashboard: Mutex::new(dashboard),
            snapshot,
        }
    }

    /// Copy the dashboard under the lock.
    pub async fn current_dashboard(&self) -> Dashboard {
        self.dashboard.lock().await.clone()
    }

    /// Last published snapshot (cheap `Arc` clone, never blocks).
    pub fn latest(&self) -> Arc<Dashboard> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to committed snapshots.
    pub fn subscribe(&self) -> DashboardStream {
        DashboardStream::new(self.snapshot.subscribe())
    }

    /// Read under the lock without publishing.
    pub async fn read<R>(&self, f: impl FnOnce(&Dashboard) -> R) -> R {
        let guard = self.dashboard.lock().await;
        f(&guard)
    }

    /// Mutate under the lock, then publish the result.
    ///
    /// `f` must not block: the closure runs inside the critical section
    /// shared with every reader.
    pub async fn mutate<R>(&self, f: impl FnOnce(&mut Dashboard) -> R) -> R {
        let mut guard = self.dashboard.lock().await;
        let result = f(&mut guard);
        // `send_replace` updates unconditionally, even with zero receivers.
        self.snapshot.send_replace(Arc::new(guard.clone()));
        result
    }
}
