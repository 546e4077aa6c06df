//! Local storage layer.
//!
//! Owns the SQLite connection and the schema. All queries and mutations go
//! through [`crate::repositories::TaskRepository`].

pub mod db;

pub use db::LocalStorage;
