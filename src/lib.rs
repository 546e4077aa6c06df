//! Tasksync - an offline-first task store with background synchronization
//!
//! This library keeps a durable local copy of a single-user task list that
//! stays fully functional while offline, and reconciles it against a remote
//! authoritative store whenever connectivity allows. Mutations are applied
//! optimistically to local storage and replicated to the remote store in the
//! background; the merge policy on reconciliation is "remote wins".
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`config`] - Application configuration management
//! * [`storage`] - Local database and data persistence
//! * [`repositories`] - Query and mutation operations on local storage
//! * [`remote`] - Remote store abstraction and data types
//! * [`sync`] - Reconciliation engine and background sync triggers
//! * [`service`] - The public command/query surface consumed by a UI

/// Configuration module for managing application settings
pub mod config;

/// Connectivity reporting abstraction
pub mod connectivity;

/// Application constants and default values
pub mod constants;

/// SeaORM entity models for database tables
pub mod entities;

/// Public error kinds
pub mod error;

/// Local identifier minting and origin classification
pub mod identity;

/// Logging setup utilities
pub mod logger;

/// Remote store abstraction layer
pub mod remote;

/// Repository layer for database operations
pub mod repositories;

/// The public task service consumed by the presentation layer
pub mod service;

/// Local storage layer
pub mod storage;

/// Reconciliation engine and background synchronization
pub mod sync;

pub use connectivity::{ConnectivityMonitor, WatchConnectivity};
pub use error::{Error, Result};
pub use identity::IdentityResolver;
pub use remote::{RemoteError, RemoteStore, RemoteTask};
pub use service::TaskService;
pub use storage::LocalStorage;
pub use sync::{SyncEngine, SyncScheduler, SyncStatus};
