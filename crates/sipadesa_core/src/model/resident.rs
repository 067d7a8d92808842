//! Resident (citizen) record.

use super::{require, RecordId, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "Laki-laki")]
    Male,
    #[serde(rename = "Perempuan")]
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Laki-laki",
            Self::Female => "Perempuan",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Laki-laki" => Some(Self::Male),
            "Perempuan" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Residency status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResidentStatus {
    /// Permanent resident.
    #[serde(rename = "Tetap")]
    Permanent,
    /// Contract/temporary resident.
    #[serde(rename = "Kontrak")]
    Contract,
    /// Moved out of the village.
    #[serde(rename = "Pindah")]
    MovedOut,
}

impl ResidentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Permanent => "Tetap",
            Self::Contract => "Kontrak",
            Self::MovedOut => "Pindah",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Tetap" => Some(Self::Permanent),
            "Kontrak" => Some(Self::Contract),
            "Pindah" => Some(Self::MovedOut),
            _ => None,
        }
    }
}

/// Stored resident record. Field names serialize in camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: RecordId,
    /// National identity number; not checksum-validated.
    pub nik: String,
    pub full_name: String,
    pub gender: Gender,
    /// `YYYY-MM-DD`; may be empty.
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub rt: String,
    #[serde(default)]
    pub rw: String,
    /// Hamlet name, e.g. `Mawar`.
    #[serde(default)]
    pub dusun: String,
    #[serde(default)]
    pub job: String,
    pub status: ResidentStatus,
}

impl Resident {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("resident", "id", &self.id)?;
        require("resident", "nik", &self.nik)?;
        require("resident", "full_name", &self.full_name)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Gender, Resident, ResidentStatus};

    #[test]
    fn deserializes_browser_record_shape() {
        let json = r#"{
            "id": "1",
            "nik": "3201010101010001",
            "fullName": "Budi Santoso",
            "gender": "Laki-laki",
            "birthDate": "1980-05-12",
            "address": "Jl. Melati No. 5",
            "rt": "01",
            "rw": "02",
            "dusun": "Mawar",
            "job": "Petani",
            "status": "Tetap"
        }"#;
        let resident: Resident = serde_json::from_str(json).unwrap();
        assert_eq!(resident.gender, Gender::Male);
        assert_eq!(resident.status, ResidentStatus::Permanent);
        assert_eq!(resident.birth_date, "1980-05-12");
        resident.validate().unwrap();
    }

    #[test]
    fn status_labels_parse_back() {
        for status in [
            ResidentStatus::Permanent,
            ResidentStatus::Contract,
            ResidentStatus::MovedOut,
        ] {
            assert_eq!(ResidentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(Gender::parse("L"), None);
    }
}
