//! User repository contract and SQLite implementation.

use super::{is_collection_seeded, mark_collection_seeded, Collection, RepoError, RepoResult};
use crate::model::user::{AccountStatus, User, UserRole};
use rusqlite::{params, Connection, Row};

pub(crate) const USER_SELECT_SQL: &str = "SELECT
    users.id AS id,
    users.username AS username,
    users.password_hash AS password_hash,
    users.full_name AS full_name,
    users.role AS role,
    users.area AS area,
    users.status AS status
FROM users";

/// Repository interface for the user collection.
pub trait UserRepository {
    /// Every stored user in insertion order.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn get_user(&self, id: &str) -> RepoResult<Option<User>>;
    /// Users whose username matches exactly (case-sensitive).
    fn find_by_username(&self, username: &str) -> RepoResult<Vec<User>>;
    /// Inserts or fully replaces the user with the same id.
    fn upsert_user(&self, user: &User) -> RepoResult<()>;
    /// Returns whether a row was removed.
    fn delete_user(&self, id: &str) -> RepoResult<bool>;
    fn is_seeded(&self) -> RepoResult<bool>;
    /// Marks the collection initialised without writing records.
    fn mark_seeded(&self) -> RepoResult<bool>;
    /// Writes `users` and the seed marker atomically, once.
    ///
    /// Returns `false` without writing when the collection is already marked.
    fn seed_users(&self, users: &[User]) -> RepoResult<bool>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY users.rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }

    fn get_user(&self, id: &str) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE users.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Vec<User>> {
        // `=` on TEXT is binary collation, i.e. case-sensitive.
        let mut stmt = self.conn.prepare(&format!(
            "{USER_SELECT_SQL} WHERE users.username = ?1 ORDER BY users.rowid ASC;"
        ))?;
        let mut rows = stmt.query([username])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }

    fn upsert_user(&self, user: &User) -> RepoResult<()> {
        user.validate()?;
        upsert_user_row(self.conn, user)
    }

    fn delete_user(&self, id: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn is_seeded(&self) -> RepoResult<bool> {
        is_collection_seeded(self.conn, Collection::Users)
    }

    fn mark_seeded(&self) -> RepoResult<bool> {
        mark_collection_seeded(self.conn, Collection::Users)
    }

    fn seed_users(&self, users: &[User]) -> RepoResult<bool> {
        for user in users {
            user.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        if !mark_collection_seeded(&tx, Collection::Users)? {
            return Ok(false);
        }
        for user in users {
            upsert_user_row(&tx, user)?;
        }
        tx.commit()?;
        Ok(true)
    }
}

fn upsert_user_row(conn: &Connection, user: &User) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO users (id, username, password_hash, full_name, role, area, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT (id) DO UPDATE SET
            username = excluded.username,
            password_hash = excluded.password_hash,
            full_name = excluded.full_name,
            role = excluded.role,
            area = excluded.area,
            status = excluded.status,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![
            user.id.as_str(),
            user.username.as_str(),
            user.password_hash.as_str(),
            user.full_name.as_str(),
            user.role.as_str(),
            user.area.as_deref(),
            user.status.as_str(),
        ],
    )?;
    Ok(())
}

pub(crate) fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id: String = row.get("id")?;

    let role_text: String = row.get("role")?;
    let role = UserRole::parse(&role_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid role `{role_text}` in users.role ({id})"))
    })?;

    let status_text: String = row.get("status")?;
    let status = AccountStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid account status `{status_text}` in users.status ({id})"
        ))
    })?;

    let user = User {
        id,
        username: row.get("username")?,
        password_hash: row.get("password_hash")?,
        full_name: row.get("full_name")?,
        role,
        area: row.get("area")?,
        status,
    };
    user.validate()
        .map_err(|err| RepoError::InvalidData(err.to_string()))?;
    Ok(user)
}
