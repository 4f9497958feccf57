//! SQLite cache for enrichment results.
//!
//! One table keyed by domain + identifier (`flight_DL123_2024-06-01`,
//! `weather_Berlin_metric`, ...). A successful fetch overwrites the entry;
//! a failed fetch reads it back and serves the payload marked stale. Entries
//! live until overwritten — offline fallback has no age cutoff.

use std::path::Path;

use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A cached enrichment payload with its fetch timestamp.
#[derive(Debug, Clone)]
pub struct CachedEnrichment {
    pub domain: String,
    pub key: String,
    pub payload: String,
    pub fetched_at: String,
}

impl CachedEnrichment {
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_str(&self.payload).ok()
    }
}

pub struct CacheDb {
    conn: Connection,
}

impl CacheDb {
    /// Open (and migrate) the cache at ~/.roadbook/cache.db.
    pub fn open() -> Result<Self, String> {
        let path = crate::config::state_dir()?.join("cache.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self, String> {
        let conn = Connection::open(path)
            .map_err(|e| format!("Failed to open cache db: {}", e))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS enrichment_cache (
                domain     TEXT NOT NULL,
                key        TEXT NOT NULL,
                payload    TEXT NOT NULL,
                fetched_at TEXT NOT NULL,
                PRIMARY KEY (domain, key)
            )",
            [],
        )
        .map_err(|e| format!("Failed to init cache schema: {}", e))?;
        Ok(Self { conn })
    }

    pub fn get(&self, domain: &str, key: &str) -> Option<CachedEnrichment> {
        self.conn
            .query_row(
                "SELECT domain, key, payload, fetched_at
                 FROM enrichment_cache WHERE domain = ?1 AND key = ?2",
                [domain, key],
                |row| {
                    Ok(CachedEnrichment {
                        domain: row.get(0)?,
                        key: row.get(1)?,
                        payload: row.get(2)?,
                        fetched_at: row.get(3)?,
                    })
                },
            )
            .ok()
    }

    /// Insert or overwrite the entry for a key, stamped now.
    pub fn put<T: Serialize>(&self, domain: &str, key: &str, value: &T) -> Result<(), String> {
        let payload = serde_json::to_string(value)
            .map_err(|e| format!("Failed to serialize cache payload: {}", e))?;
        self.conn
            .execute(
                "INSERT INTO enrichment_cache (domain, key, payload, fetched_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(domain, key) DO UPDATE SET
                    payload = excluded.payload,
                    fetched_at = excluded.fetched_at",
                rusqlite::params![domain, key, payload, chrono::Utc::now().to_rfc3339()],
            )
            .map_err(|e| format!("Failed to upsert cache entry: {}", e))?;
        Ok(())
    }

    /// Drop every entry for a domain. Explicit eviction only.
    pub fn evict_domain(&self, domain: &str) -> Result<usize, String> {
        self.conn
            .execute("DELETE FROM enrichment_cache WHERE domain = ?1", [domain])
            .map_err(|e| format!("Failed to evict cache domain: {}", e))
    }

    pub fn count(&self) -> i64 {
        self.conn
            .query_row("SELECT COUNT(*) FROM enrichment_cache", [], |row| row.get(0))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        temp: f64,
        condition: String,
    }

    fn open_temp() -> (tempfile::TempDir, CacheDb) {
        let dir = tempfile::tempdir().unwrap();
        let db = CacheDb::open_at(&dir.path().join("cache.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn put_then_get_round_trips() {
        let (_dir, db) = open_temp();
        let payload = Payload {
            temp: 18.5,
            condition: "Clouds".into(),
        };
        db.put("weather", "weather_Berlin_metric", &payload).unwrap();

        let cached = db.get("weather", "weather_Berlin_metric").unwrap();
        assert_eq!(cached.decode::<Payload>().unwrap(), payload);
        assert!(!cached.fetched_at.is_empty());
    }

    #[test]
    fn put_overwrites_the_previous_entry() {
        let (_dir, db) = open_temp();
        db.put("weather", "k", &Payload { temp: 1.0, condition: "Rain".into() })
            .unwrap();
        db.put("weather", "k", &Payload { temp: 2.0, condition: "Sun".into() })
            .unwrap();
        assert_eq!(db.count(), 1);
        let cached = db.get("weather", "k").unwrap();
        assert_eq!(cached.decode::<Payload>().unwrap().temp, 2.0);
    }

    #[test]
    fn domains_do_not_collide() {
        let (_dir, db) = open_temp();
        db.put("weather", "k", &Payload { temp: 1.0, condition: "Rain".into() })
            .unwrap();
        assert!(db.get("flight", "k").is_none());

        db.evict_domain("weather").unwrap();
        assert!(db.get("weather", "k").is_none());
    }
}
