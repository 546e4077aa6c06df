//! Reconciliation engine keeping local and remote state in sync.
//!
//! The engine owns two entry points. [`SyncEngine::push_pending`] drains the
//! backlog of unconfirmed local mutations against the remote store, one
//! record at a time, tolerating per-record failures.
//! [`SyncEngine::fetch_and_merge`] performs the full reconciliation: push,
//! fetch the authoritative list, merge it with surviving local records
//! (remote wins on id collision), and repopulate local storage.

pub mod scheduler;

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};
use sea_orm::TransactionTrait;
use tokio::sync::Mutex;

use crate::entities::task;
use crate::error::{Error, Result};
use crate::identity::IdentityResolver;
use crate::remote::{CreateTaskArgs, RemoteError, RemoteStore, RemoteTask};
use crate::repositories::TaskRepository;
use crate::storage::LocalStorage;

pub use scheduler::SyncScheduler;

/// Outcome of a push pass, reported to explicit callers of `sync()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// Another pass was already running; this trigger was dropped.
    InProgress,
    /// The pass ran to completion. `pending` counts the backlog records
    /// whose remote operation failed and will be retried later.
    Completed { pushed: usize, pending: usize },
}

/// Failure modes of a single-record push, internal to the engine and the
/// service. Remote failures leave the record pending; storage failures
/// abort the operation in progress.
#[derive(Debug)]
pub(crate) enum PushError {
    Remote(RemoteError),
    Storage(sea_orm::DbErr),
}

impl From<sea_orm::DbErr> for PushError {
    fn from(err: sea_orm::DbErr) -> Self {
        PushError::Storage(err)
    }
}

/// The sync core: owns the merge algorithm and the outbound replication of
/// pending local mutations.
#[derive(Clone)]
pub struct SyncEngine {
    storage: Arc<Mutex<LocalStorage>>,
    remote: Arc<dyn RemoteStore>,
    push_in_progress: Arc<Mutex<bool>>,
    list_limit: u32,
}

impl SyncEngine {
    pub fn new(
        storage: Arc<Mutex<LocalStorage>>,
        remote: Arc<dyn RemoteStore>,
        list_limit: u32,
    ) -> Self {
        Self {
            storage,
            remote,
            push_in_progress: Arc::new(Mutex::new(false)),
            list_limit,
        }
    }

    /// Whether a push pass is currently running.
    pub async fn is_syncing(&self) -> bool {
        *self.push_in_progress.lock().await
    }

    /// Drain the backlog of pending local mutations against the remote store.
    ///
    /// Single-flight: if a pass is already in progress the call returns
    /// [`SyncStatus::InProgress`] without touching the backlog, so two
    /// overlapping passes can never double-create remote records.
    ///
    /// Each backlog record is processed independently; a remote failure on
    /// one record is logged and never blocks the rest. Only a local storage
    /// failure aborts the pass.
    pub async fn push_pending(&self) -> Result<SyncStatus> {
        {
            let mut guard = self.push_in_progress.lock().await;
            if *guard {
                debug!("push pass already in progress, dropping trigger");
                return Ok(SyncStatus::InProgress);
            }
            *guard = true;
        }

        let result = self.drain_backlog().await;

        {
            let mut guard = self.push_in_progress.lock().await;
            *guard = false;
        }

        result
    }

    async fn drain_backlog(&self) -> Result<SyncStatus> {
        let backlog = {
            let storage = self.storage.lock().await;
            TaskRepository::get_pending(storage.conn()).await?
        };

        if backlog.is_empty() {
            return Ok(SyncStatus::Completed {
                pushed: 0,
                pending: 0,
            });
        }

        info!("pushing {} pending record(s)", backlog.len());
        let total = backlog.len();
        let mut pushed = 0;

        for record in backlog {
            match self.push_record(&record).await {
                Ok(_) => pushed += 1,
                Err(PushError::Remote(err)) => {
                    warn!("record {} stays pending: {err}", record.id);
                }
                Err(PushError::Storage(err)) => return Err(Error::Storage(err)),
            }
        }

        info!("push pass complete: {pushed} pushed, {} pending", total - pushed);
        Ok(SyncStatus::Completed {
            pushed,
            pending: total - pushed,
        })
    }

    /// Replicate a single record's pending state to the remote store.
    ///
    /// Returns the new authoritative local record when the push changed it
    /// (creation re-keys the record under the server-assigned id, updates
    /// adopt the server's resulting field values).
    pub(crate) async fn push_record(
        &self,
        record: &task::Model,
    ) -> std::result::Result<Option<task::Model>, PushError> {
        if record.is_deleted {
            // A locally minted id never reached the remote store, so there
            // is nothing to delete there.
            if !IdentityResolver::is_local_origin(record.id) {
                self.remote
                    .delete(record.id)
                    .await
                    .map_err(PushError::Remote)?;
            }
            let storage = self.storage.lock().await;
            TaskRepository::mark_synced(storage.conn(), record.id).await?;
            Ok(None)
        } else if IdentityResolver::is_local_origin(record.id) {
            let created = self
                .remote
                .create(CreateTaskArgs::from(record))
                .await
                .map_err(PushError::Remote)?;
            let confirmed = created.into_confirmed_model();

            // The identity transition must be atomic: exactly one record
            // exists afterwards, keyed by the server-assigned id.
            let storage = self.storage.lock().await;
            let txn = storage.conn().begin().await?;
            TaskRepository::remove(&txn, record.id).await?;
            TaskRepository::upsert(&txn, confirmed.clone()).await?;
            txn.commit().await?;
            Ok(Some(confirmed))
        } else {
            let updated = self
                .remote
                .update(&RemoteTask::from(record))
                .await
                .map_err(PushError::Remote)?;
            // Trust the server's response as the new ground truth.
            let confirmed = updated.into_confirmed_model();
            let storage = self.storage.lock().await;
            TaskRepository::upsert(storage.conn(), confirmed.clone()).await?;
            Ok(Some(confirmed))
        }
    }

    /// Full reconciliation pass: drain the backlog, fetch the authoritative
    /// remote list, merge, and repopulate local storage.
    ///
    /// Merge policy: every remote record is kept as-is (remote wins on id
    /// collision); local records absent from the remote result survive
    /// untouched. Soft-deleted records whose deletion is already confirmed
    /// are omitted from the merged set, which is where their deferred
    /// physical cleanup happens.
    ///
    /// A remote fetch failure aborts the merge with [`Error::MergeAborted`];
    /// callers fall back to serving local data. Local storage failures
    /// propagate.
    pub async fn fetch_and_merge(&self) -> Result<Vec<task::Model>> {
        // Best-effort: per-record remote failures are already absorbed
        // inside the pass and only reduce what the fetch below returns.
        self.push_pending().await?;

        let remote_tasks = match self.remote.list(self.list_limit).await {
            Ok(tasks) => tasks,
            Err(err) => {
                info!("remote fetch failed, abandoning merge: {err}");
                return Err(Error::MergeAborted);
            }
        };

        let storage = self.storage.lock().await;

        let remote_ids: HashSet<i64> = remote_tasks.iter().map(|t| t.id).collect();
        let mut merged: Vec<task::Model> = remote_tasks
            .into_iter()
            .map(RemoteTask::into_confirmed_model)
            .collect();

        // Local survivors: visible records plus unconfirmed soft-deletes.
        // Confirmed soft-deletes drop out of the repopulated set.
        let mut seen: HashSet<i64> = remote_ids.clone();
        let visible = TaskRepository::get_all(storage.conn()).await?;
        let pending = TaskRepository::get_pending(storage.conn()).await?;
        for record in visible.into_iter().chain(pending) {
            if seen.insert(record.id) {
                merged.push(record);
            }
        }

        let txn = storage.conn().begin().await?;
        TaskRepository::clear(&txn).await?;
        for record in merged {
            TaskRepository::upsert(&txn, record).await?;
        }
        txn.commit().await?;

        TaskRepository::get_all(storage.conn()).await.map_err(Error::Storage)
    }
}
