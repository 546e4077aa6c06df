//! SeaORM entity models.

pub mod task;
