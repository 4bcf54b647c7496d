//! SQLite-based session storage.
//!
//! Provides persistent storage for:
//! - Simulated ad delivery events (impressions, clicks, claims, dismissals)
//! - Ad delivery statistics (daily and all-time)
//! - Key-value store for application state (the serialized dashboard session)

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::data_dir;
use crate::error::{CoreError, DatabaseError};

/// What happened to an ad placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdEventKind {
    Impression,
    Click,
    Claim,
    Dismiss,
}

impl AdEventKind {
    fn as_str(self) -> &'static str {
        match self {
            AdEventKind::Impression => "impression",
            AdEventKind::Click => "click",
            AdEventKind::Claim => "claim",
            AdEventKind::Dismiss => "dismiss",
        }
    }
}

/// Aggregated ad delivery counts.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdStats {
    pub impressions: u64,
    pub clicks: u64,
    pub claims: u64,
    pub dismissals: u64,
    pub today_impressions: u64,
    pub today_clicks: u64,
}

/// SQLite database for the simulated ad delivery log.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/deskdash/deskdash.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()
            .map_err(|e| CoreError::Custom(e.to_string()))?
            .join("deskdash.db");
        let conn = Connection::open(&path)
            .map_err(|source| DatabaseError::OpenFailed { path, source })?;
        // Concurrent CLI invocations share the file; wait instead of failing.
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS ad_events (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                placement  TEXT NOT NULL,
                kind       TEXT NOT NULL,
                creative   TEXT NOT NULL DEFAULT '',
                at         TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_ad_events_at ON ad_events(at);
            CREATE INDEX IF NOT EXISTS idx_ad_events_kind ON ad_events(kind);",
        )?;
        Ok(())
    }

    /// Record one ad delivery event.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_ad_event(
        &self,
        session_id: Uuid,
        placement: &str,
        kind: AdEventKind,
        creative: &str,
        at: DateTime<Utc>,
    ) -> Result<i64, rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO ad_events (session_id, placement, kind, creative, at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session_id.to_string(),
                placement,
                kind.as_str(),
                creative,
                at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn stats_today(&self) -> Result<AdStats, rusqlite::Error> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let mut stmt = self.conn.prepare(
            "SELECT kind, COUNT(*)
             FROM ad_events
             WHERE at >= ?1
             GROUP BY kind",
        )?;

        let mut stats = AdStats::default();
        let rows = stmt.query_map(params![format!("{today}T00:00:00+00:00")], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?))
        })?;

        for row in rows {
            let (kind, count) = row?;
            match kind.as_str() {
                "impression" => {
                    stats.impressions = count;
                    stats.today_impressions = count;
                }
                "click" => {
                    stats.clicks = count;
                    stats.today_clicks = count;
                }
                "claim" => stats.claims = count,
                "dismiss" => stats.dismissals = count,
                _ => {}
            }
        }
        Ok(stats)
    }

    pub fn stats_all(&self) -> Result<AdStats, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT kind, COUNT(*)
             FROM ad_events
             GROUP BY kind",
        )?;

        let mut stats = AdStats::default();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?))
        })?;

        for row in rows {
            let (kind, count) = row?;
            match kind.as_str() {
                "impression" => stats.impressions = count,
                "click" => stats.clicks = count,
                "claim" => stats.claims = count,
                "dismiss" => stats.dismissals = count,
                _ => {}
            }
        }

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let mut stmt2 = self.conn.prepare(
            "SELECT
                COUNT(CASE WHEN kind = 'impression' THEN 1 END),
                COUNT(CASE WHEN kind = 'click' THEN 1 END)
             FROM ad_events
             WHERE at >= ?1",
        )?;
        let row = stmt2.query_row(params![format!("{today}T00:00:00+00:00")], |row| {
            Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?))
        })?;
        stats.today_impressions = row.0;
        stats.today_clicks = row.1;

        Ok(stats)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a value from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_query() {
        let db = Database::open_memory().unwrap();
        let session = Uuid::new_v4();
        let now = Utc::now();

        db.record_ad_event(session, "interstitial", AdEventKind::Impression, "Premium Weather Pro", now)
            .unwrap();
        db.record_ad_event(session, "banner:bottom", AdEventKind::Click, "Weather Pro", now)
            .unwrap();

        let stats = db.stats_all().unwrap();
        assert_eq!(stats.impressions, 1);
        assert_eq!(stats.clicks, 1);
        assert_eq!(stats.today_clicks, 1);
    }

    #[test]
    fn stats_today_counts_by_kind() {
        let db = Database::open_memory().unwrap();
        let session = Uuid::new_v4();
        let now = Utc::now();

        for _ in 0..3 {
            db.record_ad_event(session, "rewarded", AdEventKind::Claim, "Premium Features", now)
                .unwrap();
        }

        let stats = db.stats_today().unwrap();
        assert_eq!(stats.claims, 3);
        assert_eq!(stats.impressions, 0);
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.kv_get("missing").unwrap(), None);

        db.kv_set("dashboard", "{}").unwrap();
        assert_eq!(db.kv_get("dashboard").unwrap().as_deref(), Some("{}"));

        db.kv_set("dashboard", "{\"a\":1}").unwrap();
        assert_eq!(
            db.kv_get("dashboard").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        db.kv_delete("dashboard").unwrap();
        assert_eq!(db.kv_get("dashboard").unwrap(), None);
    }
}
