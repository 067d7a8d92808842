//! Session token persistence.
//!
//! # Invariants
//! - Sessions reference users by id; deleting a user cascades its sessions.

use super::user_repo::{parse_user_row, USER_SELECT_SQL};
use super::RepoResult;
use crate::model::user::User;
use rusqlite::{params, Connection};

pub trait SessionRepository {
    fn insert_session(&self, token: &str, user_id: &str, created_at_ms: i64) -> RepoResult<()>;
    /// User owning `token`, if both still exist.
    fn find_session_user(&self, token: &str) -> RepoResult<Option<User>>;
    /// Returns whether a session was removed.
    fn delete_session(&self, token: &str) -> RepoResult<bool>;
}

pub struct SqliteSessionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn insert_session(&self, token: &str, user_id: &str, created_at_ms: i64) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3);",
            params![token, user_id, created_at_ms],
        )?;
        Ok(())
    }

    fn find_session_user(&self, token: &str) -> RepoResult<Option<User>> {
        let mut stmt = self.conn.prepare(&format!(
            "{USER_SELECT_SQL}
             INNER JOIN sessions ON sessions.user_id = users.id
             WHERE sessions.token = ?1;"
        ))?;
        let mut rows = stmt.query([token])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn delete_session(&self, token: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM sessions WHERE token = ?1;", [token])?;
        Ok(changed > 0)
    }
}
