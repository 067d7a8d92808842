//! Fixed seed data written the first time each collection is accessed.

use crate::model::resident::{Gender, Resident, ResidentStatus};
use crate::model::user::{AccountStatus, User, UserRole};
use crate::service::credential::{CredentialError, PasswordHasher};

pub const DEFAULT_ADMIN_ID: &str = "admin-1";
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Seed accounts: the default village administrator.
pub fn default_users<H: PasswordHasher>(hasher: &H) -> Result<Vec<User>, CredentialError> {
    Ok(vec![User {
        id: DEFAULT_ADMIN_ID.to_string(),
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        password_hash: hasher.hash_password(DEFAULT_ADMIN_PASSWORD)?,
        full_name: "Administrator Desa".to_string(),
        role: UserRole::Admin,
        area: None,
        status: AccountStatus::Active,
    }])
}

pub fn default_residents() -> Vec<Resident> {
    vec![
        Resident {
            id: "1".to_string(),
            nik: "3201010101010001".to_string(),
            full_name: "Budi Santoso".to_string(),
            gender: Gender::Male,
            birth_date: "1980-05-12".to_string(),
            address: "Jl. Melati No. 5".to_string(),
            rt: "01".to_string(),
            rw: "02".to_string(),
            dusun: "Mawar".to_string(),
            job: "Petani".to_string(),
            status: ResidentStatus::Permanent,
        },
        Resident {
            id: "2".to_string(),
            nik: "3201010101010002".to_string(),
            full_name: "Siti Aminah".to_string(),
            gender: Gender::Female,
            birth_date: "1985-08-20".to_string(),
            address: "Jl. Anggrek No. 2".to_string(),
            rt: "02".to_string(),
            rw: "02".to_string(),
            dusun: "Melati".to_string(),
            job: "Guru".to_string(),
            status: ResidentStatus::Permanent,
        },
    ]
}
