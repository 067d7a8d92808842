//! User collection service and authentication/registration gate.
//!
//! # Responsibility
//! - Expose fetch/save/delete over the user collection with seed-on-first-access.
//! - Authenticate, register and activate accounts.
//! - Administer accounts (create/edit, password reset, removal).
//!
//! # Invariants
//! - Registration never creates an active account.
//! - Passwords are hashed before reaching the repository.
//! - A failed registration leaves the collection unchanged.

use super::credential::PasswordHasher;
use super::error::{ServiceError, ServiceResult};
use crate::model::user::{AccountStatus, User, UserRole};
use crate::model::{new_record_id, require, RecordId, ValidationError};
use crate::repo::user_repo::UserRepository;
use crate::seed;
use log::{info, warn};

/// Self-registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub full_name: String,
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

/// Administrator-supplied account fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub username: String,
    /// `None` or blank keeps the existing credential on edit.
    pub password: Option<String>,
    pub full_name: String,
    pub role: UserRole,
    pub area: Option<String>,
}

/// Use-case service for the user collection.
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repo: R,
    hasher: H,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    pub fn new(repo: R, hasher: H) -> Self {
        Self { repo, hasher }
    }

    /// Writes the seed accounts when the collection was never initialised.
    ///
    /// Returns whether seeding happened on this call.
    pub fn ensure_seeded(&self) -> ServiceResult<bool> {
        if self.repo.is_seeded()? {
            return Ok(false);
        }
        let seeded = self.repo.seed_users(&seed::default_users(&self.hasher)?)?;
        if seeded {
            info!("event=collection_seed module=user_service status=ok collection=users");
        }
        Ok(seeded)
    }

    /// Every stored account.
    pub fn fetch_all(&self) -> ServiceResult<Vec<User>> {
        self.ensure_seeded()?;
        Ok(self.repo.list_users()?)
    }

    pub fn get_user(&self, id: &str) -> ServiceResult<Option<User>> {
        self.ensure_seeded()?;
        Ok(self.repo.get_user(id)?)
    }

    /// Upserts `user` by id (full replace) and returns it.
    pub fn save(&self, user: User) -> ServiceResult<User> {
        self.ensure_seeded()?;
        self.repo.upsert_user(&user)?;
        info!(
            "event=user_save module=user_service status=ok user_id={} role={}",
            user.id,
            user.role.as_str()
        );
        Ok(user)
    }

    /// Removes the account with `id`; unknown ids are a no-op.
    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        self.ensure_seeded()?;
        let removed = self.repo.delete_user(id)?;
        info!("event=user_delete module=user_service status=ok user_id={id} removed={removed}");
        Ok(())
    }

    /// Authenticates by exact (case-sensitive) username and password.
    ///
    /// # Errors
    /// - `PendingVerification` when the credentials match an unverified account.
    /// - `InvalidCredentials` when nothing matches.
    pub fn login(&self, username: &str, password: &str) -> ServiceResult<User> {
        self.ensure_seeded()?;
        let candidates = self.repo.find_by_username(username)?;

        if candidates.is_empty() {
            // Spend the same hashing work as a real verification.
            let _ = self.hasher.hash_password(password);
            warn!("event=auth_login module=user_service status=rejected reason=invalid_credentials");
            return Err(ServiceError::InvalidCredentials);
        }

        let matched = candidates
            .into_iter()
            .find(|user| self.hasher.verify_password(&user.password_hash, password));

        match matched {
            None => {
                warn!(
                    "event=auth_login module=user_service status=rejected reason=invalid_credentials"
                );
                Err(ServiceError::InvalidCredentials)
            }
            Some(user) if !user.is_active() => {
                warn!(
                    "event=auth_login module=user_service status=rejected reason=pending_verification user_id={}",
                    user.id
                );
                Err(ServiceError::PendingVerification)
            }
            Some(user) => {
                info!(
                    "event=auth_login module=user_service status=ok user_id={} role={}",
                    user.id,
                    user.role.as_str()
                );
                Ok(user)
            }
        }
    }

    /// Creates a pending account for self-registration.
    ///
    /// # Errors
    /// - `UsernameTaken` when any account has exactly this username.
    pub fn register(&self, request: RegistrationRequest) -> ServiceResult<User> {
        require("user", "full_name", &request.full_name)?;
        require("user", "username", &request.username)?;
        require("user", "password", &request.password)?;

        self.ensure_seeded()?;
        if !self.repo.find_by_username(&request.username)?.is_empty() {
            warn!("event=auth_register module=user_service status=rejected reason=username_taken");
            return Err(ServiceError::UsernameTaken(request.username));
        }

        let user = User {
            id: new_record_id(),
            username: request.username,
            password_hash: self.hasher.hash_password(&request.password)?,
            full_name: request.full_name,
            role: request.role,
            area: None,
            status: AccountStatus::PendingVerification,
        };
        self.repo.upsert_user(&user)?;
        info!(
            "event=auth_register module=user_service status=ok user_id={} role={}",
            user.id,
            user.role.as_str()
        );
        Ok(user)
    }

    /// Activates an account, assigning its work area.
    ///
    /// `RT_RW`/`KADUS` need a non-blank `area`; other roles get no area.
    pub fn verify_user(&self, id: &str, area: Option<&str>) -> ServiceResult<User> {
        let mut user = self.require_user(id)?;
        user.area = if user.role.requires_area() {
            let assigned = area
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .ok_or(ServiceError::AreaRequired(user.role))?;
            Some(assigned.to_string())
        } else {
            None
        };
        user.status = AccountStatus::Active;
        self.repo.upsert_user(&user)?;
        info!(
            "event=user_verify module=user_service status=ok user_id={} role={}",
            user.id,
            user.role.as_str()
        );
        Ok(user)
    }

    /// Creates an active account with a fresh id.
    pub fn create_user(&self, draft: UserDraft) -> ServiceResult<User> {
        self.put_user(&new_record_id(), draft)
    }

    /// Creates or fully replaces the account stored under `id`.
    ///
    /// New accounts are active and need a password. Edits keep the stored
    /// credential and status unless a new password is supplied.
    pub fn put_user(&self, id: &str, draft: UserDraft) -> ServiceResult<User> {
        require("user", "username", &draft.username)?;
        require("user", "full_name", &draft.full_name)?;

        self.ensure_seeded()?;
        let password = draft
            .password
            .as_deref()
            .filter(|value| !value.trim().is_empty());
        let (password_hash, status) = match self.repo.get_user(id)? {
            Some(existing) => match password {
                Some(password) => (self.hasher.hash_password(password)?, existing.status),
                None => (existing.password_hash, existing.status),
            },
            None => {
                let password = password.ok_or(ValidationError::MissingField {
                    record: "user",
                    field: "password",
                })?;
                (self.hasher.hash_password(password)?, AccountStatus::Active)
            }
        };

        let area = draft
            .area
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        self.save(User {
            id: id.to_string(),
            username: draft.username,
            password_hash,
            full_name: draft.full_name,
            role: draft.role,
            area,
            status,
        })
    }

    pub fn reset_password(&self, id: &str, new_password: &str) -> ServiceResult<User> {
        require("user", "password", new_password)?;
        let mut user = self.require_user(id)?;
        user.password_hash = self.hasher.hash_password(new_password)?;
        self.repo.upsert_user(&user)?;
        info!("event=user_password_reset module=user_service status=ok user_id={id}");
        Ok(user)
    }

    /// Deletes `id` on behalf of `actor_id`, refusing self-deletion.
    pub fn remove_user(&self, actor_id: &str, id: &str) -> ServiceResult<()> {
        if actor_id == id {
            return Err(ServiceError::SelfDeletion);
        }
        self.delete(id)
    }

    fn require_user(&self, id: &str) -> ServiceResult<User> {
        self.get_user(id)?
            .ok_or_else(|| ServiceError::NotFound(RecordId::from(id)))
    }
}
