//! The public command/query surface consumed by the presentation layer.
//!
//! Every mutating operation writes to local storage before returning, so the
//! caller always receives the durable truthful state synchronously. Remote
//! calls are best-effort at the single-operation grain; the batch passes in
//! [`crate::sync`] are what make the system eventually consistent.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{info, warn};
use tokio::sync::Mutex;

use crate::connectivity::ConnectivityMonitor;
use crate::constants::{DEFAULT_OWNER_ID, DEFAULT_REMOTE_LIST_LIMIT, MIN_SEARCH_QUERY_LEN};
use crate::entities::task;
use crate::error::{Error, Result};
use crate::identity::IdentityResolver;
use crate::remote::RemoteStore;
use crate::repositories::TaskRepository;
use crate::storage::LocalStorage;
use crate::sync::{PushError, SyncEngine, SyncScheduler, SyncStatus};

/// Orchestrates local storage, identity management and the reconciliation
/// engine behind a plain command/query interface.
#[derive(Clone)]
pub struct TaskService {
    storage: Arc<Mutex<LocalStorage>>,
    engine: SyncEngine,
    identity: Arc<IdentityResolver>,
    connectivity: Arc<dyn ConnectivityMonitor>,
}

impl TaskService {
    pub fn new(
        storage: Arc<Mutex<LocalStorage>>,
        remote: Arc<dyn RemoteStore>,
        connectivity: Arc<dyn ConnectivityMonitor>,
    ) -> Self {
        let engine = SyncEngine::new(storage.clone(), remote, DEFAULT_REMOTE_LIST_LIMIT);
        Self {
            storage,
            engine,
            identity: Arc::new(IdentityResolver::new()),
            connectivity,
        }
    }

    /// Spawn the periodic and connectivity-restore background triggers for
    /// this service. The returned scheduler owns them; drop or call
    /// [`SyncScheduler::shutdown`] to stop both.
    pub fn start_background_sync(&self, interval: Duration) -> SyncScheduler {
        SyncScheduler::start(self.engine.clone(), self.connectivity.clone(), interval)
    }

    /// List all visible tasks.
    ///
    /// Online, this attempts a full reconciliation first and returns the
    /// merged result; if the remote store is unreachable or erroring the
    /// call silently degrades to the local listing. Only a local storage
    /// failure surfaces as an error.
    pub async fn list(&self) -> Result<Vec<task::Model>> {
        if self.connectivity.currently_online() {
            match self.engine.fetch_and_merge().await {
                Ok(tasks) => return Ok(tasks),
                Err(Error::Storage(err)) => return Err(Error::Storage(err)),
                Err(_) => info!("serving local data instead of merged listing"),
            }
        }

        let storage = self.storage.lock().await;
        Ok(TaskRepository::get_all(storage.conn()).await?)
    }

    /// Create a task. The record is durable and returned immediately; if
    /// currently online, one remote creation attempt runs before returning
    /// and, on success, the returned record already carries the
    /// server-assigned id.
    pub async fn add(&self, title: &str) -> Result<task::Model> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("task title must not be empty".into()));
        }

        let now = Utc::now();
        let record = task::Model {
            id: self.identity.new_local_id(),
            title: title.to_string(),
            completed: false,
            owner_id: DEFAULT_OWNER_ID,
            created_at: now,
            is_synced: false,
            is_deleted: false,
            last_modified: now,
            remote_id: None,
        };

        {
            let storage = self.storage.lock().await;
            TaskRepository::upsert(storage.conn(), record.clone()).await?;
        }

        self.try_push(record).await
    }

    /// Update a task. Marks it pending and persists it, then makes one
    /// best-effort remote attempt if online.
    pub async fn update(&self, mut record: task::Model) -> Result<task::Model> {
        record.title = record.title.trim().to_string();
        if record.title.is_empty() {
            return Err(Error::Validation("task title must not be empty".into()));
        }

        record.is_synced = false;
        {
            let storage = self.storage.lock().await;
            TaskRepository::upsert(storage.conn(), record.clone()).await?;
        }

        self.try_push(record).await
    }

    /// Soft-delete a task by id (primary key or confirmed remote id), then
    /// make one best-effort remote attempt to confirm the deletion.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let record = {
            let storage = self.storage.lock().await;
            TaskRepository::mark_deleted(storage.conn(), id).await?;
            TaskRepository::get_by_any_id(storage.conn(), id).await?
        };

        if let Some(record) = record {
            if self.connectivity.currently_online() {
                match self.engine.push_record(&record).await {
                    Ok(_) => {}
                    Err(PushError::Remote(err)) => {
                        warn!("delete of {id} stays pending: {err}");
                    }
                    Err(PushError::Storage(err)) => return Err(Error::Storage(err)),
                }
            }
        }

        Ok(())
    }

    /// Case-insensitive title search against local storage only. Search
    /// never touches the network, for latency and offline guarantees.
    pub async fn search(&self, query: &str) -> Result<Vec<task::Model>> {
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Err(Error::Validation(format!(
                "search query must be at least {MIN_SEARCH_QUERY_LEN} characters"
            )));
        }

        let storage = self.storage.lock().await;
        Ok(TaskRepository::search(storage.conn(), query).await?)
    }

    /// Explicitly drain the backlog of pending local mutations.
    pub async fn sync(&self) -> Result<SyncStatus> {
        self.engine.push_pending().await
    }

    /// Whether any local mutation still awaits remote confirmation.
    pub async fn has_pending_sync(&self) -> Result<bool> {
        let storage = self.storage.lock().await;
        let pending = TaskRepository::get_pending(storage.conn()).await?;
        Ok(!pending.is_empty())
    }

    /// One best-effort remote attempt for a freshly written record. Routes
    /// through the engine's per-record push so command-grain semantics stay
    /// identical to the batch pass (a local-origin record gets created and
    /// re-keyed, a remote-origin one gets updated).
    async fn try_push(&self, record: task::Model) -> Result<task::Model> {
        if !self.connectivity.currently_online() {
            return Ok(record);
        }

        match self.engine.push_record(&record).await {
            Ok(Some(confirmed)) => Ok(confirmed),
            Ok(None) => Ok(record),
            Err(PushError::Remote(err)) => {
                warn!("record {} stays pending: {err}", record.id);
                Ok(record)
            }
            Err(PushError::Storage(err)) => Err(Error::Storage(err)),
        }
    }
}
