//! Credential hashing and verification.
//!
//! # Invariants
//! - Only encoded hashes leave this module; plain passwords are never stored.
//! - Verification uses Argon2's constant-time comparison.

use argon2::{Config, Variant, Version};
use rand::rngs::OsRng;
use rand::RngCore;
use std::error::Error;
use std::fmt::{Display, Formatter};

const SALT_LEN: usize = 16;
const DEFAULT_MEM_COST_KIB: u32 = 19 * 1024;
const DEFAULT_TIME_COST: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialError(String);

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "credential hashing failed: {}", self.0)
    }
}

impl Error for CredentialError {}

/// Hash-and-verify abstraction used by the login/registration gate.
pub trait PasswordHasher {
    fn hash_password(&self, password: &str) -> Result<String, CredentialError>;
    /// Malformed `encoded` values verify as `false`.
    fn verify_password(&self, encoded: &str, password: &str) -> bool;
}

impl<T: PasswordHasher + ?Sized> PasswordHasher for &T {
    fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        (**self).hash_password(password)
    }

    fn verify_password(&self, encoded: &str, password: &str) -> bool {
        (**self).verify_password(encoded, password)
    }
}

/// Argon2id hasher with per-hash random salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Hasher {
    mem_cost_kib: u32,
    time_cost: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            mem_cost_kib: DEFAULT_MEM_COST_KIB,
            time_cost: DEFAULT_TIME_COST,
        }
    }
}

impl Argon2Hasher {
    /// Custom cost parameters. Low values are only meant for tests.
    pub fn with_costs(mem_cost_kib: u32, time_cost: u32) -> Self {
        Self {
            mem_cost_kib,
            time_cost,
        }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        let mut salt = [0_u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);

        let config = Config {
            variant: Variant::Argon2id,
            version: Version::Version13,
            mem_cost: self.mem_cost_kib,
            time_cost: self.time_cost,
            lanes: 1,
            ..Config::default()
        };
        argon2::hash_encoded(password.as_bytes(), &salt, &config)
            .map_err(|err| CredentialError(err.to_string()))
    }

    fn verify_password(&self, encoded: &str, password: &str) -> bool {
        argon2::verify_encoded(encoded, password.as_bytes()).unwrap_or(false)
    }
}
