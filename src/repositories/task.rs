//! Task repository for database operations.
//!
//! All functions are generic over [`ConnectionTrait`] so they run equally on
//! the shared connection or inside a transaction.

use chrono::Utc;
use sea_orm::sea_query::{Expr, LikeExpr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder,
};

use crate::entities::task;

/// Repository for task-related database operations.
pub struct TaskRepository;

impl TaskRepository {
    /// Insert-or-replace a task keyed by its primary key.
    ///
    /// Stamps `last_modified` with the current time so recency ordering in
    /// [`Self::get_all`] reflects the latest touch.
    pub async fn upsert<C>(conn: &C, record: task::Model) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let mut row = record.into_active_model();
        row.last_modified = sea_orm::ActiveValue::Set(Utc::now());

        task::Entity::insert(row)
            .on_conflict(
                OnConflict::column(task::Column::Id)
                    .update_columns([
                        task::Column::Title,
                        task::Column::Completed,
                        task::Column::OwnerId,
                        task::Column::CreatedAt,
                        task::Column::IsSynced,
                        task::Column::IsDeleted,
                        task::Column::LastModified,
                        task::Column::RemoteId,
                    ])
                    .to_owned(),
            )
            .exec(conn)
            .await?;
        Ok(())
    }

    /// All non-deleted tasks, incomplete first, most recently touched first
    /// within each group.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<task::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        task::Entity::find()
            .filter(task::Column::IsDeleted.eq(false))
            .order_by_asc(task::Column::Completed)
            .order_by_desc(task::Column::LastModified)
            .all(conn)
            .await
    }

    /// The sync backlog: every record whose state is not yet confirmed by
    /// the remote store. Soft-deleted records leave the backlog once their
    /// deletion is confirmed (`mark_synced`).
    pub async fn get_pending<C>(conn: &C) -> Result<Vec<task::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        task::Entity::find()
            .filter(task::Column::IsSynced.eq(false))
            .all(conn)
            .await
    }

    /// Get a single task by primary key.
    pub async fn get_by_id<C>(conn: &C, id: i64) -> Result<Option<task::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        task::Entity::find_by_id(id).one(conn).await
    }

    /// Get a single task matched by primary key or by its confirmed remote
    /// id, covering the window where the two diverge.
    pub async fn get_by_any_id<C>(conn: &C, id: i64) -> Result<Option<task::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        task::Entity::find()
            .filter(Self::either_key(id))
            .one(conn)
            .await
    }

    /// Soft-delete: hides the record from listings and returns it to the
    /// backlog until the deletion is confirmed remotely.
    pub async fn mark_deleted<C>(conn: &C, id: i64) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        task::Entity::update_many()
            .col_expr(task::Column::IsDeleted, Expr::value(true))
            .col_expr(task::Column::IsSynced, Expr::value(false))
            .col_expr(task::Column::LastModified, Expr::value(Utc::now()))
            .filter(Self::either_key(id))
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Mark a record as confirmed by the remote store.
    pub async fn mark_synced<C>(conn: &C, id: i64) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        task::Entity::update_many()
            .col_expr(task::Column::IsSynced, Expr::value(true))
            .filter(Self::either_key(id))
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Physical delete by primary key.
    pub async fn remove<C>(conn: &C, id: i64) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        task::Entity::delete_by_id(id).exec(conn).await?;
        Ok(())
    }

    /// Substring match on title, excluding deleted records.
    ///
    /// Case folding follows SQLite `LIKE` (ASCII only). `%` and `_` in the
    /// query are escaped, so they match their literal characters.
    pub async fn search<C>(conn: &C, query: &str) -> Result<Vec<task::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let pattern = format!("%{}%", escape_like(query));
        task::Entity::find()
            .filter(task::Column::IsDeleted.eq(false))
            .filter(task::Column::Title.like(LikeExpr::new(pattern).escape('\\')))
            .order_by_asc(task::Column::Completed)
            .order_by_desc(task::Column::LastModified)
            .all(conn)
            .await
    }

    /// Remove all records. Used only by the full-merge repopulation step.
    pub async fn clear<C>(conn: &C) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        task::Entity::delete_many().exec(conn).await?;
        Ok(())
    }

    fn either_key(id: i64) -> Condition {
        Condition::any()
            .add(task::Column::Id.eq(id))
            .add(task::Column::RemoteId.eq(id))
    }
}

fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
