// ── Fleet abstraction ──
//
// Full lifecycle management for a set of printers. Owns the dashboard
// state and the background tasks: status poller, catalog watcher, and
// command processor.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indexmap::IndexMap;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::PrinterClient;
use crate::command::{Command, CommandEnvelope, route_command};
use crate::config::FleetConfig;
use crate::error::CoreError;
use crate::model::{Dashboard, PrinterHandle};
use crate::poller::{CycleSummary, poll_cycle};
use crate::store::DashboardState;
use crate::stream::DashboardStream;
use crate::watcher::{CatalogWatcher, ReloadSummary, WatchPhase};

const COMMAND_CHANNEL_SIZE: usize = 64;

/// One configured printer and the client that reaches it.
#[derive(Clone)]
pub struct PrinterBinding {
    pub name: String,
    pub host_key: String,
    pub gcode_directory: PathBuf,
    pub client: Arc<dyn PrinterClient>,
}

// ── Fleet ────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<FleetInner>`. The printer set is fixed at
/// construction; [`start()`](Self::start) loads catalogs and spawns the
/// background loops, [`shutdown()`](Self::shutdown) stops them.
#[derive(Clone)]
pub struct Fleet {
    inner: Arc<FleetInner>,
}

struct FleetInner {
    config: FleetConfig,
    state: Arc<DashboardState>,
    /// Name -> client, in dashboard printer order.
    clients: IndexMap<String, Arc<dyn PrinterClient>>,
    catalog: Arc<CatalogWatcher>,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    started: AtomicBool,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Fleet {
    /// Build a fleet from its printers. Does NOT start anything; call
    /// [`start()`](Self::start) to load catalogs and spawn background tasks.
    pub fn new(config: FleetConfig, bindings: Vec<PrinterBinding>) -> Result<Self, CoreError> {
        let mut clients = IndexMap::with_capacity(bindings.len());
        let mut printers = Vec::with_capacity(bindings.len());
        for binding in bindings {
            if clients.contains_key(&binding.name) {
                return Err(CoreError::Config {
                    message: format!("duplicate printer name '{}'", binding.name),
                });
            }
            printers.push(PrinterHandle::new(
                binding.name.clone(),
                binding.host_key,
                binding.gcode_directory,
            ));
            clients.insert(binding.name, binding.client);
        }

        let state = Arc::new(DashboardState::new(printers));
        let catalog = Arc::new(CatalogWatcher::new(Arc::clone(&state)));
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

        Ok(Self {
            inner: Arc::new(FleetInner {
                config,
                state,
                clients,
                catalog,
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel: CancellationToken::new(),
                started: AtomicBool::new(false),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Access the fleet configuration.
    pub fn config(&self) -> &FleetConfig {
        &self.inner.config
    }

    /// Access the underlying dashboard state.
    pub fn state(&self) -> &Arc<DashboardState> {
        &self.inner.state
    }

    /// Printer names in dashboard order.
    pub fn printer_names(&self) -> impl Iterator<Item = &str> {
        self.inner.clients.keys().map(String::as_str)
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Load every catalog, establish directory watches, and spawn the
    /// background tasks enabled by the configuration.
    ///
    /// Fails if the directory watches cannot be established, or with
    /// [`CoreError::AlreadyStarted`] when called a second time.
    pub async fn start(&self) -> Result<(), CoreError> {
        if self.inner.started.swap(true, Ordering::AcqRel) {
            return Err(CoreError::AlreadyStarted);
        }
        let config = &self.inner.config;
        let summary = self.inner.catalog.reload().await;
        info!(
            reloaded = summary.reloaded,
            failed = summary.failed,
            "initial catalog load complete"
        );

        let mut handles = self.inner.task_handles.lock().await;

        if config.watch_files {
            let (watcher, events) = match self.inner.catalog.establish().await {
                Ok(established) => established,
                Err(e) => {
                    // Nothing spawned yet, so start may be retried.
                    self.inner.started.store(false, Ordering::Release);
                    return Err(e);
                }
            };
            let catalog = Arc::clone(&self.inner.catalog);
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(async move {
                // The backend stops delivering events once the watcher drops.
                let _watcher = watcher;
                catalog.run(events, cancel).await;
            }));
        }

        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let fleet = self.clone();
            handles.push(tokio::spawn(command_processor_task(fleet, rx)));
        }

        if !config.poll_interval.is_zero() {
            let fleet = self.clone();
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(poll_task(fleet, config.poll_interval, cancel)));
        }

        info!(printers = self.inner.clients.len(), "fleet started");
        Ok(())
    }

    /// Stop every background task.
    ///
    /// Tasks get `shutdown_grace` in total to finish in-flight work; any
    /// still running after that are aborted.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let deadline = Instant::now() + self.inner.config.shutdown_grace;
        let mut handles = self.inner.task_handles.lock().await;
        for mut handle in handles.drain(..) {
            if tokio::time::timeout_at(deadline, &mut handle).await.is_err() {
                warn!("background task did not stop in time, aborting");
                handle.abort();
            }
        }
        debug!("fleet stopped");
    }

    /// One-shot: start the command processor only, run the closure, shut down.
    ///
    /// Optimized for CLI: no poll loop and no directory watches.
    pub async fn oneshot<F, Fut, T>(
        config: FleetConfig,
        bindings: Vec<PrinterBinding>,
        f: F,
    ) -> Result<T, CoreError>
    where
        F: FnOnce(Fleet) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.poll_interval = Duration::ZERO;
        cfg.watch_files = false;

        let fleet = Fleet::new(cfg, bindings)?;
        fleet.start().await?;
        let result = f(fleet.clone()).await;
        fleet.shutdown().await;
        result
    }

    // ── Operations ───────────────────────────────────────────────

    /// Run one poll cycle now, independent of the poll loop.
    pub async fn poll_once(&self) -> CycleSummary {
        let clients: Vec<Arc<dyn PrinterClient>> = self.inner.clients.values().cloned().collect();
        poll_cycle(&self.inner.state, &clients, self.inner.config.fetch_timeout).await
    }

    /// Reload every printer's catalog now.
    pub async fn reload_catalogs(&self) -> ReloadSummary {
        self.inner.catalog.reload().await
    }

    /// Execute a command through the command processor.
    pub async fn execute(&self, cmd: Command) -> Result<(), CoreError> {
        if self.inner.cancel.is_cancelled() {
            return Err(CoreError::NotRunning);
        }

        let (tx, rx) = oneshot::channel();
        self.inner
            .command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::NotRunning)?;

        rx.await.map_err(|_| CoreError::NotRunning)?
    }

    // ── State observation ────────────────────────────────────────

    /// Copy of the dashboard taken under the state lock.
    pub async fn current_dashboard(&self) -> Dashboard {
        self.inner.state.current_dashboard().await
    }

    /// Last published snapshot, without taking the state lock.
    pub fn latest(&self) -> Arc<Dashboard> {
        self.inner.state.latest()
    }

    /// Subscribe to committed dashboard snapshots.
    pub fn subscribe(&self) -> DashboardStream {
        self.inner.state.subscribe()
    }

    /// Subscribe to catalog watcher phase transitions.
    pub fn watch_phase(&self) -> tokio::sync::watch::Receiver<WatchPhase> {
        self.inner.catalog.phase()
    }

    /// The catalog coordinator, for reload counts and manual reloads.
    pub fn catalog_watcher(&self) -> &Arc<CatalogWatcher> {
        &self.inner.catalog
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Poll on a fixed period until cancelled. A cycle that overruns the
/// period delays the next one instead of bunching ticks.
async fn poll_task(fleet: Fleet, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                fleet.poll_once().await;
            }
        }
    }
}

/// Process commands from the mpsc channel one at a time.
async fn command_processor_task(fleet: Fleet, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = fleet.inner.cancel.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = route_command(&fleet.inner.clients, envelope.command).await;
                if let Err(ref e) = result {
                    warn!(error = %e, "command failed");
                }
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}
