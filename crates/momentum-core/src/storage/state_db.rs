//! SQLite-backed tracker state storage.
//!
//! The full tracker state persists as JSON documents in a key-value
//! table, one document per logical area (profile, tasks, habits,
//! gamification, finance). Writes replace the whole document for an
//! area, so schema evolution stays a serde concern.

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use super::data_dir;
use crate::error::DatabaseError;
use crate::tracker::{AppState, StateStore};

const KEY_USER: &str = "user";
const KEY_TASKS: &str = "tasks";
const KEY_HABITS: &str = "habits";
const KEY_GAMIFICATION: &str = "gamification";
const KEY_FINANCE: &str = "finance";

/// SQLite database holding the tracker state.
pub struct StateDb {
    conn: Connection,
}

impl StateDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/momentum/momentum.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("momentum.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Delete a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Wipe every stored document.
    pub fn reset(&self) -> Result<(), DatabaseError> {
        self.conn.execute("DELETE FROM kv", [])?;
        Ok(())
    }

    fn load_doc<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DatabaseError> {
        match self.kv_get(key)? {
            Some(raw) => {
                let doc = serde_json::from_str(&raw).map_err(|e| DatabaseError::Corrupt {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    fn save_doc<T: Serialize>(&self, key: &str, doc: &T) -> Result<(), DatabaseError> {
        let raw = serde_json::to_string(doc).map_err(|e| DatabaseError::Corrupt {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.kv_set(key, &raw)
    }

    /// Load the full tracker state.
    ///
    /// Missing documents fall back to their defaults; a present but
    /// undecodable document is an error.
    pub fn load_state(&self) -> Result<AppState, DatabaseError> {
        Ok(AppState {
            user: self.load_doc(KEY_USER)?,
            tasks: self.load_doc(KEY_TASKS)?.unwrap_or_default(),
            habits: self.load_doc(KEY_HABITS)?.unwrap_or_default(),
            game: self.load_doc(KEY_GAMIFICATION)?.unwrap_or_default(),
            ledger: self.load_doc(KEY_FINANCE)?.unwrap_or_default(),
        })
    }

    /// Persist the full tracker state.
    ///
    /// # Errors
    /// Returns an error if any document cannot be written.
    pub fn save_state(&self, state: &AppState) -> Result<(), DatabaseError> {
        match &state.user {
            Some(user) => self.save_doc(KEY_USER, user)?,
            None => self.kv_delete(KEY_USER)?,
        }
        self.save_doc(KEY_TASKS, &state.tasks)?;
        self.save_doc(KEY_HABITS, &state.habits)?;
        self.save_doc(KEY_GAMIFICATION, &state.game)?;
        self.save_doc(KEY_FINANCE, &state.ledger)?;
        Ok(())
    }
}

impl StateStore for StateDb {
    fn load(&self) -> Result<AppState, Box<dyn std::error::Error>> {
        Ok(self.load_state()?)
    }

    fn save(&self, state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
        Ok(self.save_state(state)?)
    }
}
