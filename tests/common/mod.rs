//! Shared test fixtures: an in-memory remote store with failure injection
//! and a call log, plus service construction helpers.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Mutex as AsyncMutex, Notify};

use tasksync::connectivity::{ConnectivityMonitor, WatchConnectivity};
use tasksync::remote::{CreateTaskArgs, RemoteError, RemoteStore, RemoteTask};
use tasksync::storage::LocalStorage;
use tasksync::TaskService;

/// In-memory stand-in for the authoritative remote store.
#[derive(Default)]
pub struct MockRemote {
    tasks: Mutex<BTreeMap<i64, RemoteTask>>,
    next_id: AtomicI64,
    fail_creates: AtomicBool,
    fail_updates: AtomicBool,
    fail_deletes: AtomicBool,
    fail_lists: AtomicBool,
    /// Titles for which `create` fails, regardless of the global flag.
    poisoned_titles: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
    /// When set, `create` parks after announcing itself until released,
    /// letting tests overlap a second trigger with an in-flight pass.
    hold_creates: AtomicBool,
    create_entered: Notify,
    create_release: Notify,
}

impl MockRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed(&self, task: RemoteTask) {
        self.tasks.lock().unwrap().insert(task.id, task);
    }

    pub fn snapshot(&self) -> Vec<RemoteTask> {
        self.tasks.lock().unwrap().values().cloned().collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn poison_title(&self, title: &str) {
        self.poisoned_titles.lock().unwrap().push(title.to_string());
    }

    pub fn set_hold_creates(&self, hold: bool) {
        self.hold_creates.store(hold, Ordering::SeqCst);
    }

    /// Wait until a held `create` call has been entered.
    pub async fn wait_for_held_create(&self) {
        self.create_entered.notified().await;
    }

    /// Let a held `create` call proceed.
    pub fn release_held_create(&self) {
        self.create_release.notify_one();
    }

    fn record_call(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RemoteStore for MockRemote {
    async fn list(&self, limit: u32) -> Result<Vec<RemoteTask>, RemoteError> {
        self.record_call("list".to_string());
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(RemoteError::NetworkUnavailable);
        }
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .values()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, args: CreateTaskArgs) -> Result<RemoteTask, RemoteError> {
        self.record_call(format!("create:{}", args.title));
        if self.hold_creates.load(Ordering::SeqCst) {
            self.create_entered.notify_one();
            self.create_release.notified().await;
        }
        let poisoned = self
            .poisoned_titles
            .lock()
            .unwrap()
            .iter()
            .any(|t| t == &args.title);
        if poisoned || self.fail_creates.load(Ordering::SeqCst) {
            return Err(RemoteError::Timeout);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let task = RemoteTask {
            id,
            title: args.title,
            completed: args.completed,
            owner_id: args.owner_id,
            created_at: args.created_at,
        };
        self.tasks.lock().unwrap().insert(id, task.clone());
        Ok(task)
    }

    async fn update(&self, remote: &RemoteTask) -> Result<RemoteTask, RemoteError> {
        self.record_call(format!("update:{}", remote.id));
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(RemoteError::Timeout);
        }

        let mut tasks = self.tasks.lock().unwrap();
        if !tasks.contains_key(&remote.id) {
            return Err(RemoteError::NotFound(remote.id.to_string()));
        }
        tasks.insert(remote.id, remote.clone());
        Ok(remote.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RemoteError> {
        self.record_call(format!("delete:{id}"));
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(RemoteError::Timeout);
        }
        self.tasks.lock().unwrap().remove(&id);
        Ok(())
    }
}

/// A service over in-memory storage, the given remote, and a scriptable
/// connectivity monitor.
pub async fn make_service(
    remote: Arc<MockRemote>,
    initially_online: bool,
) -> (
    TaskService,
    Arc<WatchConnectivity>,
    Arc<AsyncMutex<LocalStorage>>,
) {
    let storage = Arc::new(AsyncMutex::new(
        LocalStorage::in_memory().await.expect("in-memory storage"),
    ));
    let connectivity = Arc::new(WatchConnectivity::new(initially_online));
    let remote_dyn: Arc<dyn RemoteStore> = remote;
    let connectivity_dyn: Arc<dyn ConnectivityMonitor> = connectivity.clone();
    let service = TaskService::new(storage.clone(), remote_dyn, connectivity_dyn);
    (service, connectivity, storage)
}
