//! User account model.
//!
//! # Invariants
//! - `password_hash` always holds an encoded hash, never plain text.
//! - Activation is tracked by `status`; `area` only describes the work area.

use super::{require, RecordId, ValidationError};
use serde::{Deserialize, Serialize};

/// Fixed set of village-government roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Village administrator.
    Admin,
    /// Neighborhood/community unit chair (Ketua RT/RW).
    RtRw,
    /// Hamlet head (Kepala Dusun).
    Kadus,
    /// Section head (Kepala Seksi).
    Kasi,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [Self::Admin, Self::RtRw, Self::Kadus, Self::Kasi];

    /// Storage/wire code, e.g. `RT_RW`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::RtRw => "RT_RW",
            Self::Kadus => "KADUS",
            Self::Kasi => "KASI",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ADMIN" => Some(Self::Admin),
            "RT_RW" => Some(Self::RtRw),
            "KADUS" => Some(Self::Kadus),
            "KASI" => Some(Self::Kasi),
            _ => None,
        }
    }

    /// Human-facing title.
    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::RtRw => "Ketua RT/RW",
            Self::Kadus => "Kepala Dusun",
            Self::Kasi => "Kepala Seksi",
        }
    }

    /// Whether activation must assign a work area.
    pub fn requires_area(self) -> bool {
        matches!(self, Self::RtRw | Self::Kadus)
    }
}

/// Account activation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    /// Self-registered, waiting for an administrator.
    PendingVerification,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::PendingVerification => "pending_verification",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "pending_verification" => Some(Self::PendingVerification),
            _ => None,
        }
    }
}

/// Stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub username: String,
    /// Encoded credential hash. Never serialized outward.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    /// RT/RW label for `RtRw`, hamlet label for `Kadus`.
    pub area: Option<String>,
    pub status: AccountStatus,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Non-blank area label, if any.
    pub fn area_label(&self) -> Option<&str> {
        self.area
            .as_deref()
            .map(str::trim)
            .filter(|area| !area.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("user", "id", &self.id)?;
        require("user", "username", &self.username)?;
        require("user", "full_name", &self.full_name)?;
        require("user", "password_hash", &self.password_hash)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AccountStatus, User, UserRole};

    fn sample() -> User {
        User {
            id: "u-1".to_string(),
            username: "kadus".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            full_name: "Kepala Dusun Mawar".to_string(),
            role: UserRole::Kadus,
            area: Some("  Dusun Mawar ".to_string()),
            status: AccountStatus::Active,
        }
    }

    #[test]
    fn role_codes_round_trip() {
        for role in UserRole::ALL {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("rt_rw"), None);
    }

    #[test]
    fn serialized_user_omits_hash_and_uses_wire_codes() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["role"], "KADUS");
        assert_eq!(json["fullName"], "Kepala Dusun Mawar");
        assert_eq!(json["status"], "active");
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn area_label_trims_and_drops_blank() {
        let mut user = sample();
        assert_eq!(user.area_label(), Some("Dusun Mawar"));
        user.area = Some("   ".to_string());
        assert_eq!(user.area_label(), None);
    }

    #[test]
    fn validate_requires_hash() {
        let mut user = sample();
        user.password_hash.clear();
        assert!(user.validate().is_err());
    }
}
