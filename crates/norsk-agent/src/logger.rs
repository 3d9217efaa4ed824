//! Append-only interaction log backed by SQLite.
//!
//! Writes are fire-and-forget: a failed insert is reported via `tracing` and
//! never reaches the caller's critical path, so a broken log can never break
//! a user-facing response. Only opening the database is fallible.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::warn;

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS logs (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  ts REAL NOT NULL,
  mode TEXT NOT NULL,
  session_id TEXT,
  input TEXT NOT NULL,
  output TEXT NOT NULL,
  meta TEXT
);";

/// One row read back from the log (newest first from [`InteractionLog::recent`]).
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub ts: f64,
    pub mode: String,
    pub session_id: Option<String>,
    pub input: String,
    pub output: String,
    pub meta: Option<String>,
}

/// Append-only sink for per-call interaction records.
pub struct InteractionLog {
    conn: Mutex<Connection>,
}

impl InteractionLog {
    /// Open (or create) the log database and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory log, used by tests.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Append one interaction. Best-effort: failures are logged and dropped.
    pub fn log_interaction(
        &self,
        mode: &str,
        session_id: Option<&str>,
        input: &str,
        output: &str,
        meta: Option<&serde_json::Value>,
    ) {
        let ts = Utc::now().timestamp_micros() as f64 * 1e-6;
        let meta_text = meta.map(|m| m.to_string());
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = conn.execute(
            "INSERT INTO logs (ts, mode, session_id, input, output, meta) VALUES (?1,?2,?3,?4,?5,?6)",
            params![ts, mode, session_id, input, output, meta_text],
        ) {
            warn!(mode, error = %e, "interaction log write failed");
        }
    }

    /// Newest `limit` entries, most recent first.
    pub fn recent(&self, limit: usize) -> Result<Vec<LogEntry>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let mut stmt = conn.prepare(
            "SELECT ts, mode, session_id, input, output, meta \
             FROM logs ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(LogEntry {
                ts: row.get(0)?,
                mode: row.get(1)?,
                session_id: row.get(2)?,
                input: row.get(3)?,
                output: row.get(4)?,
                meta: row.get(5)?,
            })
        })?;
        rows.collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn logged_interactions_read_back_newest_first() {
        let log = InteractionLog::open_in_memory().unwrap();
        log.log_interaction("fix", Some("s1"), "inn", "ut", None);
        log.log_interaction("score", Some("s1"), "inn2", "ut2", Some(&json!({"level": "B1"})));

        let entries = log.recent(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].mode, "score");
        assert_eq!(entries[0].meta.as_deref(), Some(r#"{"level":"B1"}"#));
        assert_eq!(entries[1].mode, "fix");
        assert_eq!(entries[1].session_id.as_deref(), Some("s1"));
        assert!(entries[1].ts > 0.0);
    }

    #[test]
    fn missing_session_and_meta_store_as_null() {
        let log = InteractionLog::open_in_memory().unwrap();
        log.log_interaction("evaluate", None, "a", "b", None);
        let entries = log.recent(1).unwrap();
        assert_eq!(entries[0].session_id, None);
        assert_eq!(entries[0].meta, None);
    }

    #[test]
    fn opens_on_disk_and_persists_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("norsk-agent.db");
        {
            let log = InteractionLog::open(&path).unwrap();
            log.log_interaction("fix", Some("s"), "x", "y", None);
        }
        let reopened = InteractionLog::open(&path).unwrap();
        assert_eq!(reopened.recent(10).unwrap().len(), 1);
    }
}
