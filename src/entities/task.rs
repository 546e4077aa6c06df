use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A task record with its per-record sync metadata.
///
/// `id` is either a server-assigned id or a locally minted one (see
/// [`crate::identity`]); `remote_id` carries the confirmed server id when it
/// transiently diverges from the primary key. A row with `is_deleted = true`
/// is hidden from all user-facing listings but kept until the deletion is
/// confirmed remotely.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub owner_id: i64,
    pub created_at: DateTimeUtc,
    /// True iff the current field values are known to match the remote store.
    pub is_synced: bool,
    /// Soft-delete flag; physical removal is deferred.
    pub is_deleted: bool,
    pub last_modified: DateTimeUtc,
    /// Server-assigned id, when known under a different primary key.
    pub remote_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
