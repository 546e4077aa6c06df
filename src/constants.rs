//! Application constants and default values.

/// Owner assigned to every task in this single-user deployment.
pub const DEFAULT_OWNER_ID: i64 = 1;

/// Minimum length of a search query accepted by [`crate::TaskService::search`].
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Default page size requested from the remote store during a full merge.
pub const DEFAULT_REMOTE_LIST_LIMIT: u32 = 200;

/// Default interval between background push passes, in minutes.
pub const DEFAULT_AUTO_SYNC_INTERVAL_MINUTES: u64 = 5;
