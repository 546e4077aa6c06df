use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

use crate::entities::task;

/// Local storage manager owning the database connection.
///
/// The handle is opened once and shared for the lifetime of the service that
/// owns it. The schema is created on open if it does not exist.
pub struct LocalStorage {
    pub(crate) conn: DatabaseConnection,
}

impl LocalStorage {
    /// Open (or create) the database at `database_url`.
    pub async fn new(database_url: &str) -> Result<Self, DbErr> {
        let conn = Database::connect(database_url).await?;
        let storage = LocalStorage { conn };
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Open a fresh in-memory database. Used by the test suite and by
    /// embedders that do not want persistence across restarts.
    pub async fn in_memory() -> Result<Self, DbErr> {
        Self::new("sqlite::memory:").await
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<(), DbErr> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);
        let mut create_tasks = schema.create_table_from_entity(task::Entity);
        create_tasks.if_not_exists();
        self.conn.execute(backend.build(&create_tasks)).await?;
        Ok(())
    }

    /// Access the underlying connection.
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }
}
