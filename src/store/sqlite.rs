use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use rusqlite_migration::{Migrations, M};

use crate::app::{EstuaryError, Result};
use crate::store::LastReadStore;

pub struct SqliteLastReadStore {
    conn: Mutex<Connection>,
    cache: Mutex<Option<HashMap<String, DateTime<Utc>>>>,
}

impl SqliteLastReadStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
            cache: Mutex::new(None),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
            cache: Mutex::new(None),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock_conn()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| EstuaryError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            EstuaryError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn load_all(&self) -> Result<HashMap<String, DateTime<Utc>>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare("SELECT feed_id, last_read_at FROM feed_last_read")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut map = HashMap::new();
        for row in rows {
            let (feed_id, raw) = row?;
            match Self::parse_datetime(&raw) {
                Some(at) => {
                    map.insert(feed_id, at);
                }
                None => {
                    tracing::warn!(%feed_id, %raw, "skipping unparsable last-read timestamp");
                }
            }
        }
        Ok(map)
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }
}

impl LastReadStore for SqliteLastReadStore {
    fn get(&self, feed_id: &str) -> Result<Option<DateTime<Utc>>> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|e| EstuaryError::Other(format!("last-read cache lock poisoned: {e}")))?;

        if cache.is_none() {
            *cache = Some(self.load_all()?);
        }

        Ok(cache
            .as_ref()
            .and_then(|map| map.get(feed_id))
            .copied())
    }

    fn set(&self, feed_id: &str, at: DateTime<Utc>) -> Result<()> {
        {
            let conn = self.lock_conn()?;
            conn.execute(
                "INSERT INTO feed_last_read (feed_id, last_read_at) VALUES (?1, ?2)
                 ON CONFLICT(feed_id) DO UPDATE SET last_read_at = excluded.last_read_at",
                params![feed_id, at.to_rfc3339()],
            )?;
        }

        let mut cache = self
            .cache
            .lock()
            .map_err(|e| EstuaryError::Other(format!("last-read cache lock poisoned: {e}")))?;
        if let Some(map) = cache.as_mut() {
            map.insert(feed_id.to_string(), at);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_unknown_feed_is_none() {
        let store = SqliteLastReadStore::in_memory().unwrap();
        assert_eq!(store.get("f-1").unwrap(), None);
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let store = SqliteLastReadStore::in_memory().unwrap();
        let at = Utc::now();
        store.set("f-1", at).unwrap();

        let got = store.get("f-1").unwrap().unwrap();
        // RFC3339 storage keeps sub-second precision.
        assert_eq!(got.to_rfc3339(), at.to_rfc3339());
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let store = SqliteLastReadStore::in_memory().unwrap();
        let first = Utc::now();
        let second = first + chrono::Duration::hours(1);
        store.set("f-1", first).unwrap();
        store.set("f-1", second).unwrap();

        assert_eq!(store.get("f-1").unwrap().unwrap().to_rfc3339(), second.to_rfc3339());
    }

    #[test]
    fn test_write_through_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estuary.db");
        let at = Utc::now();

        {
            let store = SqliteLastReadStore::new(&path).unwrap();
            store.set("f-1", at).unwrap();
        }

        let reopened = SqliteLastReadStore::new(&path).unwrap();
        assert_eq!(
            reopened.get("f-1").unwrap().unwrap().to_rfc3339(),
            at.to_rfc3339()
        );
        assert_eq!(reopened.get("f-2").unwrap(), None);
    }

    #[test]
    fn test_cache_sees_writes_after_hydration() {
        let store = SqliteLastReadStore::in_memory().unwrap();
        // First read hydrates an empty cache.
        assert_eq!(store.get("f-1").unwrap(), None);

        let at = Utc::now();
        store.set("f-1", at).unwrap();
        assert_eq!(store.get("f-1").unwrap().unwrap().to_rfc3339(), at.to_rfc3339());
    }
}
