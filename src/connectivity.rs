//! Connectivity reporting abstraction.
//!
//! The sync engine only needs two things from the platform: the current
//! online/offline state, and a stream of transitions so a restored
//! connection can trigger a push pass.

use tokio::sync::watch;

/// Reports current and changing online/offline status.
pub trait ConnectivityMonitor: Send + Sync {
    /// Current reachability of the remote store.
    fn currently_online(&self) -> bool;

    /// A receiver observing every online/offline transition. The channel
    /// never closes while the monitor is alive.
    fn status_changes(&self) -> watch::Receiver<bool>;
}

/// A watch-channel backed monitor driven by explicit state updates.
///
/// Embedding applications feed platform connectivity events into
/// [`WatchConnectivity::set_online`]; the test suite uses it to script
/// offline/online scenarios.
pub struct WatchConnectivity {
    tx: watch::Sender<bool>,
}

impl WatchConnectivity {
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self { tx }
    }

    /// Record a connectivity change. Redundant updates (same state twice)
    /// are not broadcast.
    pub fn set_online(&self, online: bool) {
        self.tx.send_if_modified(|state| {
            let changed = *state != online;
            *state = online;
            changed
        });
    }
}

impl ConnectivityMonitor for WatchConnectivity {
    fn currently_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn status_changes(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
