//! Core records logic for the SIPADESA village administration system.
//! This crate is the single source of truth for record invariants.

pub mod db;
pub mod legacy;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod seed;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError};
pub use legacy::{
    export_snapshot, import_snapshot, parse_snapshot, ImportReport, LegacySnapshot, LegacyUser,
    PENDING_VERIFICATION_AREA,
};
pub use logging::{default_log_level, init_logging, logging_status, LogOptions, LoggingError};
pub use model::resident::{Gender, Resident, ResidentStatus};
pub use model::user::{AccountStatus, User, UserRole};
pub use model::{new_record_id, RecordId, ValidationError};
pub use report::age::AgeRule;
pub use report::scope::{filter_residents, hamlet_key, ResidentScope};
pub use report::stats::ResidentStats;
pub use repo::resident_repo::{ResidentRepository, SqliteResidentRepository};
pub use repo::session_repo::{SessionRepository, SqliteSessionRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{Collection, RepoError, RepoResult};
pub use service::credential::{Argon2Hasher, CredentialError, PasswordHasher};
pub use service::error::{ServiceError, ServiceResult};
pub use service::resident_service::ResidentService;
pub use service::session_service::{Session, SessionService};
pub use service::user_service::{RegistrationRequest, UserDraft, UserService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
