pub mod sqlite;

use chrono::{DateTime, Utc};

use crate::app::Result;

pub use sqlite::SqliteLastReadStore;

/// Per-feed "last read" instants.
///
/// Passed explicitly to whoever needs it; there is no ambient singleton.
/// Implementations are expected to be cheap to read repeatedly — the
/// SQLite store hydrates an in-memory cache on first access and writes
/// through on every `set`.
pub trait LastReadStore: Send + Sync {
    fn get(&self, feed_id: &str) -> Result<Option<DateTime<Utc>>>;
    fn set(&self, feed_id: &str, at: DateTime<Utc>) -> Result<()>;
}
