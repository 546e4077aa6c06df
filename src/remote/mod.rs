//! Remote store abstraction layer.
//!
//! This module defines the interface to the authoritative remote task store,
//! along with wire-agnostic data types and error handling. The concrete
//! transport (HTTP client, serialization, retries) lives behind the
//! [`RemoteStore`] trait and is supplied by the embedding application.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::task;

/// Common error types for remote operations.
///
/// The engine treats every variant uniformly: the affected record stays
/// pending and is retried on a later pass.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("request timed out")]
    Timeout,

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("server fault: {0}")]
    ServerFault(String),

    #[error("network unavailable")]
    NetworkUnavailable,

    #[error("remote error: {0}")]
    Unknown(String),
}

/// A task as the remote store represents it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTask {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Arguments for creating a new remote task. No id: the server assigns one.
#[derive(Clone, Debug)]
pub struct CreateTaskArgs {
    pub title: String,
    pub completed: bool,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

impl RemoteTask {
    /// Convert the server's representation into a confirmed local record.
    pub fn into_confirmed_model(self) -> task::Model {
        task::Model {
            id: self.id,
            title: self.title,
            completed: self.completed,
            owner_id: self.owner_id,
            created_at: self.created_at,
            is_synced: true,
            is_deleted: false,
            last_modified: Utc::now(),
            remote_id: Some(self.id),
        }
    }
}

impl From<&task::Model> for RemoteTask {
    fn from(record: &task::Model) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            completed: record.completed,
            owner_id: record.owner_id,
            created_at: record.created_at,
        }
    }
}

impl From<&task::Model> for CreateTaskArgs {
    fn from(record: &task::Model) -> Self {
        Self {
            title: record.title.clone(),
            completed: record.completed,
            owner_id: record.owner_id,
            created_at: record.created_at,
        }
    }
}

/// The authoritative remote CRUD surface, keyed by server-assigned ids.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the authoritative task list, up to `limit` records.
    async fn list(&self, limit: u32) -> Result<Vec<RemoteTask>, RemoteError>;

    /// Create a task; the server assigns and returns its id.
    async fn create(&self, args: CreateTaskArgs) -> Result<RemoteTask, RemoteError>;

    /// Update a task by its remote id, returning the server's resulting state.
    async fn update(&self, remote: &RemoteTask) -> Result<RemoteTask, RemoteError>;

    /// Delete a task by its remote id.
    async fn delete(&self, id: i64) -> Result<(), RemoteError>;
}
