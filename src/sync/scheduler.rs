//! Background synchronization triggers.
//!
//! Two independent triggers invoke the same push entry point: a periodic
//! timer and a connectivity listener that fires when the connection is
//! restored. The engine's single-flight lock keeps them from overlapping.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::connectivity::ConnectivityMonitor;
use crate::sync::SyncEngine;

/// Owns the background sync tasks for the lifetime of a service.
///
/// Both triggers are cancelled together by [`SyncScheduler::shutdown`];
/// calling it more than once is a no-op.
pub struct SyncScheduler {
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
    stopped: AtomicBool,
}

impl SyncScheduler {
    /// Spawn the periodic and connectivity-restore triggers.
    ///
    /// `interval` of zero disables the periodic trigger; the connectivity
    /// listener always runs.
    pub fn start(
        engine: SyncEngine,
        connectivity: Arc<dyn ConnectivityMonitor>,
        interval: Duration,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        let mut handles = Vec::new();

        if !interval.is_zero() {
            handles.push(tokio::spawn(periodic_loop(
                engine.clone(),
                interval,
                shutdown_tx.subscribe(),
            )));
        }

        // Capture the starting state here, not inside the task, so a
        // transition arriving before the task first polls is still seen
        // as a transition.
        let status_rx = connectivity.status_changes();
        let initially_online = *status_rx.borrow();
        handles.push(tokio::spawn(connectivity_loop(
            engine,
            status_rx,
            initially_online,
            shutdown_tx.subscribe(),
        )));

        Self {
            shutdown_tx,
            handles,
            stopped: AtomicBool::new(false),
        }
    }

    /// Stop both triggers. In-flight remote calls are allowed to finish;
    /// the local store remains valid for the process lifetime, so their
    /// trailing writes are harmless.
    pub fn shutdown(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown_tx.send(true);
        info!("sync scheduler stopped");
    }

    /// Wait for both trigger tasks to exit. Call after [`Self::shutdown`].
    pub async fn join(mut self) {
        for handle in std::mem::take(&mut self.handles) {
            let _ = handle.await;
        }
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            let _ = self.shutdown_tx.send(true);
        }
    }
}

async fn periodic_loop(engine: SyncEngine, period: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(period);
    // The first tick fires immediately; skip it so startup does not race
    // the embedding application's own initial sync.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = engine.push_pending().await {
                    warn!("periodic sync pass failed: {err}");
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}

async fn connectivity_loop(
    engine: SyncEngine,
    mut status: watch::Receiver<bool>,
    mut was_online: bool,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    // Monitor dropped; no more transitions will arrive.
                    break;
                }
                let online = *status.borrow_and_update();
                if online && !was_online {
                    info!("connectivity restored, draining sync backlog");
                    if let Err(err) = engine.push_pending().await {
                        warn!("connectivity-triggered sync pass failed: {err}");
                    }
                }
                was_online = online;
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}
