use serde::{Deserialize, Serialize};
use sipadesa_core::{Gender, Resident, ResidentStatus, User, UserRole};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    pub full_name: String,
    pub role: UserRole,
    #[serde(default)]
    pub area: Option<String>,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub area: Option<String>,
}

#[derive(Deserialize)]
pub struct PasswordRequest {
    pub password: String,
}

#[derive(Deserialize)]
pub struct ResidentQuery {
    #[serde(default)]
    pub q: String,
}

/// Resident form body; the id comes from the path.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentPayload {
    pub nik: String,
    pub full_name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub rt: String,
    #[serde(default)]
    pub rw: String,
    #[serde(default)]
    pub dusun: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub status: Option<ResidentStatus>,
}

impl ResidentPayload {
    /// Builds the stored record, filling form defaults.
    ///
    /// A blank `rt` falls back to the neighbourhood number in an `RT_RW`
    /// editor's area label (`"RT 03 / RW 01"` gives `"03"`).
    pub fn into_resident(self, id: String, editor: &User) -> Resident {
        let rt = if self.rt.trim().is_empty() && editor.role == UserRole::RtRw {
            editor
                .area_label()
                .and_then(|area| area.split(' ').nth(1))
                .unwrap_or_default()
                .to_string()
        } else {
            self.rt
        };
        Resident {
            id,
            nik: self.nik,
            full_name: self.full_name,
            gender: self.gender.unwrap_or(Gender::Male),
            birth_date: self.birth_date,
            address: self.address,
            rt,
            rw: self.rw,
            dusun: self.dusun,
            job: self.job,
            status: self.status.unwrap_or(ResidentStatus::Permanent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResidentPayload;
    use sipadesa_core::{AccountStatus, Gender, ResidentStatus, User, UserRole};

    fn editor(role: UserRole, area: Option<&str>) -> User {
        User {
            id: "u-1".to_string(),
            username: "rt03".to_string(),
            password_hash: "hash".to_string(),
            full_name: "Pak RT".to_string(),
            role,
            area: area.map(str::to_string),
            status: AccountStatus::Active,
        }
    }

    fn payload(json: &str) -> ResidentPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn missing_fields_take_form_defaults() {
        let resident = payload(r#"{"nik":"1","fullName":"A"}"#)
            .into_resident("9".to_string(), &editor(UserRole::Admin, None));
        assert_eq!(resident.gender, Gender::Male);
        assert_eq!(resident.status, ResidentStatus::Permanent);
        assert_eq!(resident.rt, "");
    }

    #[test]
    fn rt_defaults_from_neighbourhood_area() {
        let resident = payload(r#"{"nik":"1","fullName":"A"}"#).into_resident(
            "9".to_string(),
            &editor(UserRole::RtRw, Some("RT 03 / RW 01")),
        );
        assert_eq!(resident.rt, "03");

        let explicit = payload(r#"{"nik":"1","fullName":"A","rt":"05"}"#).into_resident(
            "9".to_string(),
            &editor(UserRole::RtRw, Some("RT 03 / RW 01")),
        );
        assert_eq!(explicit.rt, "05");
    }
}
