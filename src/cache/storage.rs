//! SQLite-based persistent tier for the query cache
//!
//! Each row holds one cached read as JSON text. The key segments are stored
//! alongside the hashed key so prefix filters can be applied without knowing
//! every concrete key in advance.

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::key::{KeyFilter, KeySegment, QueryKey};
use crate::error::CacheError;

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 3;

type Result<T> = std::result::Result<T, CacheError>;

/// A persisted read that has not yet expired.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub data: String,
    pub fetched_at: DateTime<Utc>,
}

/// SQLite-backed cache storage
pub struct CacheStorage {
    conn: Connection,
    db_path: PathBuf,
}

impl CacheStorage {
    /// Open or create cache storage at the default XDG cache location
    pub fn open() -> Result<Self> {
        let cache_dir = Self::cache_dir()?;
        Self::open_at(&cache_dir)
    }

    /// Get the cache directory path (~/.cache/polarop on Linux)
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(CacheError::NoHome)?;
        Ok(cache_base.join("polarop"))
    }

    /// Open cache storage at a specific directory (for testing)
    pub fn open_at(cache_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)
            .map_err(|e| CacheError::Io(format!("Failed to create cache dir: {}", e)))?;

        let db_path = cache_dir.join("cache.db");
        let conn = Connection::open(&db_path)?;

        // Check schema version - nuke if mismatched
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "Cache schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            Self::nuke(&db_path)?;
            return Self::open_at(cache_dir);
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS cache_entries (
                storage_key TEXT PRIMARY KEY NOT NULL,
                root TEXT NOT NULL,
                segments TEXT NOT NULL,
                data TEXT NOT NULL,
                fetched_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL,
                size_bytes INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_expires_at ON cache_entries(expires_at);
            CREATE INDEX IF NOT EXISTS idx_root ON cache_entries(root);
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self { conn, db_path })
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Get cached data if valid (not expired)
    pub fn get(&self, key: &QueryKey) -> Result<Option<StoredEntry>> {
        let now = Utc::now().timestamp();

        let row: Option<(String, i64)> = self
            .conn
            .query_row(
                "SELECT data, fetched_at FROM cache_entries
                 WHERE storage_key = ?1 AND expires_at > ?2",
                params![key.storage_key(), now],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        Ok(row.map(|(data, fetched_at)| StoredEntry {
            data,
            fetched_at: Utc
                .timestamp_opt(fetched_at, 0)
                .single()
                .unwrap_or_else(Utc::now),
        }))
    }

    /// Store data; it stays readable for `ttl` after `fetched_at`.
    pub fn put(
        &self,
        key: &QueryKey,
        data: &str,
        fetched_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<()> {
        let fetched = fetched_at.timestamp();
        let expires = fetched + ttl.as_secs() as i64;
        let segments = serde_json::to_string(&key.segments())
            .map_err(|e| CacheError::Io(format!("Failed to encode key: {}", e)))?;

        self.conn.execute(
            "INSERT OR REPLACE INTO cache_entries
             (storage_key, root, segments, data, fetched_at, expires_at, size_bytes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                key.storage_key(),
                key.root(),
                segments,
                data,
                fetched,
                expires,
                data.len()
            ],
        )?;
        Ok(())
    }

    /// Delete every entry the filter matches
    pub fn delete_matching(&self, filter: &KeyFilter) -> Result<usize> {
        let keys = self.keys_matching(filter)?;
        let mut deleted = 0;
        for key in &keys {
            deleted += self
                .conn
                .execute("DELETE FROM cache_entries WHERE storage_key = ?1", [key])?;
        }
        Ok(deleted)
    }

    /// Rewrite the data of every live entry the filter matches.
    ///
    /// `update` returns `None` to leave an entry as it is. Rewritten entries
    /// count as fetched at `fetched_at` and expire `ttl` later.
    pub fn update_matching(
        &self,
        filter: &KeyFilter,
        fetched_at: DateTime<Utc>,
        ttl: Duration,
        mut update: impl FnMut(&str) -> Option<String>,
    ) -> Result<usize> {
        let now = Utc::now().timestamp();
        let fetched = fetched_at.timestamp();
        let expires = fetched + ttl.as_secs() as i64;
        let mut updated = 0;

        for key in self.keys_matching(filter)? {
            let data: Option<String> = self
                .conn
                .query_row(
                    "SELECT data FROM cache_entries WHERE storage_key = ?1 AND expires_at > ?2",
                    params![key, now],
                    |r| r.get(0),
                )
                .optional()?;

            if let Some(new_data) = data.as_deref().and_then(&mut update) {
                updated += self.conn.execute(
                    "UPDATE cache_entries
                     SET data = ?1, size_bytes = ?2, fetched_at = ?3, expires_at = ?4
                     WHERE storage_key = ?5",
                    params![new_data, new_data.len(), fetched, expires, key],
                )?;
            }
        }

        Ok(updated)
    }

    /// Clear all cache entries
    pub fn clear_all(&self) -> Result<ClearStats> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cache_entries", [], |r| r.get(0))?;

        self.conn.execute("DELETE FROM cache_entries", [])?;

        Ok(ClearStats {
            entries_removed: count as usize,
        })
    }

    /// Get cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        let now = Utc::now().timestamp();

        let total_entries: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM cache_entries", [], |r| r.get(0))?;

        let valid_entries: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM cache_entries WHERE expires_at > ?1",
            [now],
            |r| r.get(0),
        )?;

        let total_size: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(size_bytes), 0) FROM cache_entries",
            [],
            |r| r.get(0),
        )?;

        let (oldest, newest): (Option<i64>, Option<i64>) = self.conn.query_row(
            "SELECT MIN(fetched_at), MAX(fetched_at) FROM cache_entries WHERE expires_at > ?1",
            [now],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;

        Ok(CacheStats {
            total_entries: total_entries as usize,
            valid_entries: valid_entries as usize,
            expired_entries: (total_entries - valid_entries) as usize,
            total_size_bytes: total_size as usize,
            oldest_entry: oldest,
            newest_entry: newest,
        })
    }

    /// Storage keys of rows whose segments the filter matches
    fn keys_matching(&self, filter: &KeyFilter) -> Result<Vec<String>> {
        if let KeyFilter::Exact(key) = filter {
            return Ok(vec![key.storage_key()]);
        }

        let rows: Vec<(String, String)> = match filter.root() {
            Some(root) => {
                let mut stmt = self
                    .conn
                    .prepare("SELECT storage_key, segments FROM cache_entries WHERE root = ?1")?;
                stmt.query_map([root], |r| Ok((r.get(0)?, r.get(1)?)))?
                    .collect::<std::result::Result<_, _>>()?
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare("SELECT storage_key, segments FROM cache_entries")?;
                stmt.query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        Ok(rows
            .into_iter()
            .filter(|(_, segments)| {
                serde_json::from_str::<Vec<KeySegment>>(segments)
                    .is_ok_and(|segments| filter.matches_segments(&segments))
            })
            .map(|(key, _)| key)
            .collect())
    }

    /// Nuke the cache database
    fn nuke(db_path: &Path) -> Result<()> {
        if db_path.exists() {
            std::fs::remove_file(db_path)
                .map_err(|e| CacheError::Io(format!("Failed to remove cache DB: {}", e)))?;
        }
        Ok(())
    }
}

/// Statistics about cache clear operation
#[derive(Debug)]
pub struct ClearStats {
    pub entries_removed: usize,
}

/// Statistics about cache state
#[derive(Debug)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub total_size_bytes: usize,
    pub oldest_entry: Option<i64>,
    pub newest_entry: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_storage() -> (CacheStorage, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = CacheStorage::open_at(dir.path()).unwrap();
        (storage, dir)
    }

    fn org_key(id: &str) -> QueryKey {
        QueryKey::Organization { id: id.into() }
    }

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_put_get() {
        let (storage, _dir) = test_storage();

        storage
            .put(&org_key("o1"), r#"{"id":"o1"}"#, Utc::now(), MINUTE)
            .unwrap();

        let entry = storage.get(&org_key("o1")).unwrap().unwrap();
        assert_eq!(entry.data, r#"{"id":"o1"}"#);
        assert!(storage.get(&org_key("o2")).unwrap().is_none());
    }

    #[test]
    fn test_expiration() {
        let (storage, _dir) = test_storage();

        // Zero TTL is immediately expired
        storage
            .put(&org_key("o1"), "{}", Utc::now(), Duration::ZERO)
            .unwrap();

        assert!(storage.get(&org_key("o1")).unwrap().is_none());
        assert_eq!(storage.stats().unwrap().expired_entries, 1);
    }

    #[test]
    fn test_delete_matching_prefix() {
        let (storage, _dir) = test_storage();
        let now = Utc::now();

        storage
            .put(&QueryKey::AllOrganizations { admin_only: true }, "[]", now, MINUTE)
            .unwrap();
        storage
            .put(&QueryKey::AllOrganizations { admin_only: false }, "[]", now, MINUTE)
            .unwrap();
        storage
            .put(&QueryKey::AdminOrganizations, "[]", now, MINUTE)
            .unwrap();

        let deleted = storage
            .delete_matching(&KeyFilter::all_organizations())
            .unwrap();
        assert_eq!(deleted, 2);
        assert!(storage.get(&QueryKey::AdminOrganizations).unwrap().is_some());
    }

    #[test]
    fn test_delete_matching_exact() {
        let (storage, _dir) = test_storage();
        storage.put(&org_key("o1"), "{}", Utc::now(), MINUTE).unwrap();
        storage.put(&org_key("o2"), "{}", Utc::now(), MINUTE).unwrap();

        assert_eq!(storage.delete_matching(&org_key("o1").into()).unwrap(), 1);
        assert!(storage.get(&org_key("o2")).unwrap().is_some());
    }

    #[test]
    fn test_update_matching() {
        let (storage, _dir) = test_storage();
        let earlier = Utc::now() - chrono::Duration::seconds(40);
        storage.put(&org_key("o1"), "old", earlier, MINUTE).unwrap();
        storage.put(&org_key("o2"), "keep", earlier, MINUTE).unwrap();

        let now = Utc::now();
        let updated = storage
            .update_matching(
                &KeyFilter::Prefix(vec!["organization".into()]),
                now,
                MINUTE,
                |data| (data == "old").then(|| "new".to_string()),
            )
            .unwrap();

        assert_eq!(updated, 1);
        let rewritten = storage.get(&org_key("o1")).unwrap().unwrap();
        assert_eq!(rewritten.data, "new");
        assert_eq!(rewritten.fetched_at.timestamp(), now.timestamp());

        let kept = storage.get(&org_key("o2")).unwrap().unwrap();
        assert_eq!(kept.data, "keep");
        assert_eq!(kept.fetched_at.timestamp(), earlier.timestamp());
    }

    #[test]
    fn test_clear_all() {
        let (storage, _dir) = test_storage();
        storage.put(&org_key("o1"), "{}", Utc::now(), MINUTE).unwrap();
        storage.put(&org_key("o2"), "{}", Utc::now(), MINUTE).unwrap();

        let stats = storage.clear_all().unwrap();
        assert_eq!(stats.entries_removed, 2);
        assert!(storage.get(&org_key("o1")).unwrap().is_none());
    }

    #[test]
    fn test_stats() {
        let (storage, _dir) = test_storage();
        storage.put(&org_key("o1"), "data1", Utc::now(), MINUTE).unwrap();
        storage.put(&org_key("o2"), "data2", Utc::now(), MINUTE).unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.valid_entries, 2);
        assert_eq!(stats.total_size_bytes, 10);
        assert!(stats.oldest_entry.is_some());
    }

    #[test]
    fn test_reopen_keeps_entries() {
        let dir = TempDir::new().unwrap();
        {
            let storage = CacheStorage::open_at(dir.path()).unwrap();
            storage.put(&org_key("o1"), "{}", Utc::now(), MINUTE).unwrap();
        }
        let storage = CacheStorage::open_at(dir.path()).unwrap();
        assert!(storage.get(&org_key("o1")).unwrap().is_some());
        assert!(storage.path().ends_with("cache.db"));
    }
}
