//! People collection repository contract and SQLite key-value implementation.
//!
//! # Responsibility
//! - Load and save the serialized people collection under one fixed key.
//! - Keep SQL and JSON codec details inside the persistence boundary.
//!
//! # Invariants
//! - `save` replaces the previous value in full; there are no partial or
//!   delta writes.
//! - `load` distinguishes an absent value (empty collection) from an
//!   unparseable one (`RepoError::Corrupt`).

use crate::db::DbError;
use crate::model::person::Person;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed key the whole collection is stored under.
pub const PEOPLE_KEY: &str = "people";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from people collection persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Stored value is present but cannot be parsed as a collection.
    Corrupt { source: serde_json::Error },
    /// In-memory collection could not be serialized for writing.
    Encode { source: serde_json::Error },
}

impl RepoError {
    /// Whether this error means the persisted value exists but is unreadable.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Corrupt { source } => {
                write!(f, "corrupt persisted state under key `{PEOPLE_KEY}`: {source}")
            }
            Self::Encode { source } => {
                write!(f, "failed to serialize people collection: {source}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Corrupt { source } | Self::Encode { source } => Some(source),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable-store contract for the people collection.
///
/// Implementations persist full-collection snapshots; callers rely on
/// last-write-wins semantics at this boundary.
pub trait PeopleRepository {
    fn load(&self) -> RepoResult<Vec<Person>>;
    fn save(&self, people: &[Person]) -> RepoResult<()>;
}

/// SQLite-backed key-value repository for the people collection.
///
/// Owns a migrated connection; the collection lives as UTF-8 JSON text in
/// one `kv_store` row.
#[derive(Debug)]
pub struct SqliteKvPeopleRepository {
    conn: Connection,
}

impl SqliteKvPeopleRepository {
    /// Wraps a connection previously opened through `db::open_db*`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Returns the raw stored value for the collection key, if any.
    ///
    /// Exposed for diagnostics and corrupt-state recovery; regular callers
    /// use `load`.
    pub fn raw_value(&self) -> RepoResult<Option<String>> {
        let raw = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [PEOPLE_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(raw)
    }

    /// Copies the current raw value under `people.<suffix>`.
    ///
    /// Used before falling back to an empty collection so unreadable data
    /// is preserved rather than discarded. No-op when nothing is stored.
    pub fn backup_raw(&self, suffix: &str) -> RepoResult<()> {
        let backup_key = format!("{PEOPLE_KEY}.{suffix}");
        let copied = self.conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value)
             SELECT ?1, value FROM kv_store WHERE key = ?2;",
            params![backup_key, PEOPLE_KEY],
        )?;

        if copied > 0 {
            log::warn!(
                "event=people_backup module=repo status=ok key={backup_key} source_key={PEOPLE_KEY}"
            );
        }
        Ok(())
    }
}

impl PeopleRepository for SqliteKvPeopleRepository {
    fn load(&self) -> RepoResult<Vec<Person>> {
        match self.raw_value()? {
            None => Ok(Vec::new()),
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|source| RepoError::Corrupt { source })
            }
        }
    }

    fn save(&self, people: &[Person]) -> RepoResult<()> {
        let encoded =
            serde_json::to_string(people).map_err(|source| RepoError::Encode { source })?;

        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![PEOPLE_KEY, encoded],
        )?;

        Ok(())
    }
}
