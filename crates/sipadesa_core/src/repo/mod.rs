//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-collection data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Writes are per-record (`upsert`/`delete` by id), never whole-collection
//!   rewrites.
//! - Write paths call `validate()` before SQL mutations.
//! - Read paths reject undecodable persisted rows (`InvalidData`) instead of
//!   masking them.

use crate::db::DbError;
use crate::model::ValidationError;
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod resident_repo;
pub mod session_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
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

/// Logical collection keys. The key strings match the browser store layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Residents,
}

impl Collection {
    pub fn key(self) -> &'static str {
        match self {
            Self::Users => "sipadesa_users",
            Self::Residents => "sipadesa_residents",
        }
    }
}

pub(crate) fn is_collection_seeded(conn: &Connection, collection: Collection) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM seed_markers WHERE collection = ?1);",
        [collection.key()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Returns `true` when this call created the marker.
pub(crate) fn mark_collection_seeded(
    conn: &Connection,
    collection: Collection,
) -> RepoResult<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO seed_markers (collection) VALUES (?1);",
        params![collection.key()],
    )?;
    Ok(changed == 1)
}
