//! Repository pattern for deck persistence.

use crate::db::error::DbError;
use crate::db::schema::{SCHEMA, SCHEMA_VERSION};
use chrono::Utc;
use lingoflip_core::types::CustomDeck;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::path::Path;
use tracing::warn;

type Result<T> = std::result::Result<T, DbError>;

/// Key under which the full deck list is stored.
pub const DECKS_KEY: &str = "lingoflip_custom_decks";

/// Persistence of user-authored decks.
pub trait DeckStore {
    /// Every saved deck. Missing or unreadable data yields an empty list.
    fn load(&self) -> Vec<CustomDeck>;

    /// Replace the saved deck list.
    fn save(&self, decks: &[CustomDeck]) -> Result<()>;
}

/// Decode the persisted deck list, treating bad data as no decks.
fn decode_decks(raw: Option<String>) -> Vec<CustomDeck> {
    let Some(json) = raw else {
        return Vec::new();
    };
    match serde_json::from_str(&json) {
        Ok(decks) => decks,
        Err(e) => {
            warn!(error = %e, "failed to load custom decks, starting empty");
            Vec::new()
        }
    }
}

/// SQLite implementation of the key-value store.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }
}

impl DeckStore for SqliteRepository {
    fn load(&self) -> Vec<CustomDeck> {
        match self.get_value(DECKS_KEY) {
            Ok(raw) => decode_decks(raw),
            Err(e) => {
                warn!(error = %e, "failed to read custom decks, starting empty");
                Vec::new()
            }
        }
    }

    fn save(&self, decks: &[CustomDeck]) -> Result<()> {
        let json = serde_json::to_string(decks)?;
        self.set_value(DECKS_KEY, &json)
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryDeckStore {
    raw: RefCell<Option<String>>,
}

impl MemoryDeckStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already-serialized value, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
        }
    }

    /// The serialized deck list as last saved.
    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl DeckStore for MemoryDeckStore {
    fn load(&self) -> Vec<CustomDeck> {
        decode_decks(self.raw())
    }

    fn save(&self, decks: &[CustomDeck]) -> Result<()> {
        let json = serde_json::to_string(decks)?;
        *self.raw.borrow_mut() = Some(json);
        Ok(())
    }
}
