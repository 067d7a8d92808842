//! Browser-store snapshot import/export.
//!
//! # Responsibility
//! - Read the key-value layout of the original browser store: one JSON
//!   array per collection under `sipadesa_users` and `sipadesa_residents`.
//!   Values may be arrays or JSON-encoded strings (a raw local-storage dump).
//! - Translate the pending-verification area sentinel into `AccountStatus`.
//!
//! # Invariants
//! - Plain-text passwords are hashed on import and never exported.
//! - An import runs in one transaction and marks imported collections as
//!   initialised so they are not seeded afterwards.
//! - Records merge by id into whatever is already stored.

use crate::model::resident::Resident;
use crate::model::user::{AccountStatus, User, UserRole};
use crate::model::{new_record_id, RecordId};
use crate::repo::resident_repo::{ResidentRepository, SqliteResidentRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::Collection;
use crate::service::credential::PasswordHasher;
use crate::service::error::{ServiceError, ServiceResult};
use log::info;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Area placeholder the browser store used for unverified accounts.
pub const PENDING_VERIFICATION_AREA: &str = "Menunggu Verifikasi Admin";

/// User record in the browser-store shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyUser {
    pub id: RecordId,
    pub username: String,
    /// Plain text in the source store; always omitted on export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub full_name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

impl LegacyUser {
    /// Converts to a stored user, hashing the password.
    ///
    /// Records without a password get an unguessable credential and need a
    /// password reset before they can log in.
    pub fn to_user<H: PasswordHasher>(&self, hasher: &H) -> ServiceResult<User> {
        let area = self
            .area
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        let (status, area) = match area {
            Some(PENDING_VERIFICATION_AREA) => (AccountStatus::PendingVerification, None),
            other => (AccountStatus::Active, other.map(str::to_string)),
        };

        let password_hash = match self.password.as_deref().filter(|value| !value.is_empty()) {
            Some(password) => hasher.hash_password(password)?,
            None => hasher.hash_password(&new_record_id())?,
        };

        Ok(User {
            id: self.id.clone(),
            username: self.username.clone(),
            password_hash,
            full_name: self.full_name.clone(),
            role: self.role,
            area,
            status,
        })
    }
}

impl From<&User> for LegacyUser {
    fn from(user: &User) -> Self {
        let area = match user.status {
            AccountStatus::PendingVerification => Some(PENDING_VERIFICATION_AREA.to_string()),
            AccountStatus::Active => user.area.clone(),
        };
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            password: None,
            full_name: user.full_name.clone(),
            role: user.role,
            area,
        }
    }
}

/// Whole browser-store snapshot. Absent keys stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacySnapshot {
    #[serde(rename = "sipadesa_users", default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<LegacyUser>>,
    #[serde(
        rename = "sipadesa_residents",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub residents: Option<Vec<Resident>>,
}

/// Counts of records written by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub users: usize,
    pub residents: usize,
}

/// Parses a snapshot document.
///
/// # Errors
/// - `CorruptState` when the document or a collection value does not decode.
pub fn parse_snapshot(json: &str) -> ServiceResult<LegacySnapshot> {
    let root: Value = serde_json::from_str(json)
        .map_err(|err| ServiceError::CorruptState(format!("snapshot is not valid JSON: {err}")))?;
    let object = root.as_object().ok_or_else(|| {
        ServiceError::CorruptState("snapshot root must be a JSON object".to_string())
    })?;

    Ok(LegacySnapshot {
        users: decode_collection(object.get(Collection::Users.key()), Collection::Users)?,
        residents: decode_collection(
            object.get(Collection::Residents.key()),
            Collection::Residents,
        )?,
    })
}

fn decode_collection<T: DeserializeOwned>(
    value: Option<&Value>,
    collection: Collection,
) -> ServiceResult<Option<Vec<T>>> {
    let decoded = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(encoded)) => serde_json::from_str(encoded),
        Some(other) => serde_json::from_value(other.clone()),
    };
    decoded.map(Some).map_err(|err| {
        ServiceError::CorruptState(format!("`{}` does not decode: {err}", collection.key()))
    })
}

/// Writes every record of `snapshot` into the store in one transaction.
pub fn import_snapshot<H: PasswordHasher>(
    conn: &Connection,
    hasher: &H,
    snapshot: &LegacySnapshot,
) -> ServiceResult<ImportReport> {
    let users = match &snapshot.users {
        Some(records) => Some(
            records
                .iter()
                .map(|record| record.to_user(hasher))
                .collect::<ServiceResult<Vec<_>>>()?,
        ),
        None => None,
    };

    let mut report = ImportReport::default();
    let tx = conn.unchecked_transaction()?;
    {
        let user_repo = SqliteUserRepository::new(&tx);
        if let Some(users) = &users {
            for user in users {
                user_repo.upsert_user(user)?;
            }
            user_repo.mark_seeded()?;
            report.users = users.len();
        }

        let resident_repo = SqliteResidentRepository::new(&tx);
        if let Some(residents) = &snapshot.residents {
            for resident in residents {
                resident_repo.upsert_resident(resident)?;
            }
            resident_repo.mark_seeded()?;
            report.residents = residents.len();
        }
    }
    tx.commit()?;

    info!(
        "event=legacy_import module=legacy status=ok users={} residents={}",
        report.users, report.residents
    );
    Ok(report)
}

/// Reads both collections back into the browser-store layout.
///
/// Does not seed. A collection that was never initialised is left out of
/// the snapshot, so importing it later still seeds on first access.
pub fn export_snapshot(conn: &Connection) -> ServiceResult<LegacySnapshot> {
    let user_repo = SqliteUserRepository::new(conn);
    let users = if user_repo.is_seeded()? {
        Some(user_repo.list_users()?.iter().map(LegacyUser::from).collect())
    } else {
        None
    };

    let resident_repo = SqliteResidentRepository::new(conn);
    let residents = if resident_repo.is_seeded()? {
        Some(resident_repo.list_residents()?)
    } else {
        None
    };

    Ok(LegacySnapshot { users, residents })
}
