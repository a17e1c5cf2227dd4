//! Query cache for API reads
//!
//! An in-memory query cache with typed keys, retry policies and in-flight
//! de-duplication, optionally backed by SQLite so reads survive between
//! command invocations.

pub mod key;
pub mod query;
pub mod retry;
pub mod storage;

use std::time::Duration;

/// How long a read stays fresh unless a query asks otherwise.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(30);

// Re-export main types
pub use key::{KeyFilter, QueryKey};
pub use query::QueryClient;
#[cfg(test)]
pub use query::QueryOptions;
pub use retry::RetryPolicy;
pub use storage::CacheStorage;
