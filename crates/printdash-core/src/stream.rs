// ── Reactive dashboard stream ──
//
// Subscription type for consuming committed dashboard snapshots.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::stream::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Dashboard;

/// A subscription to the dashboard.
///
/// Provides both point-in-time snapshot access and change notification via
/// [`changed()`](Self::changed) or by converting into a `Stream`.
pub struct DashboardStream {
    current: Arc<Dashboard>,
    receiver: watch::Receiver<Arc<Dashboard>>,
}

impl DashboardStream {
    pub(crate) fn new(mut receiver: watch::Receiver<Arc<Dashboard>>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The snapshot seen most recently through this subscription.
    pub fn current(&self) -> &Arc<Dashboard> {
        &self.current
    }

    /// The latest published snapshot (may be newer than `current`).
    pub fn latest(&self) -> Arc<Dashboard> {
        self.receiver.borrow().clone()
    }

    /// Whether a snapshot newer than `current` has been published.
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Wait for the next committed change, returning the new snapshot.
    /// Returns `None` once the state has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Dashboard>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snap);
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> DashboardWatchStream {
        DashboardWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the current snapshot first, then one per committed mutation
/// (intermediate states may be skipped by slow consumers).
pub struct DashboardWatchStream {
    inner: WatchStream<Arc<Dashboard>>,
}

impl Stream for DashboardWatchStream {
    type Item = Arc<Dashboard>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
