//! Login accounts and portal roles.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::session::SessionKey;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Argon2 hash of the account password
    pub password: String,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Nurse,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Patient, Role::Doctor, Role::Nurse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Nurse => "nurse",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Doctor => "Doctor",
            Self::Nurse => "Nurse",
        }
    }

    /// Where a successful login for this role lands
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Self::Patient => "/patient",
            Self::Doctor => "/doctor",
            Self::Nurse => "/nurse",
        }
    }

    /// Session key holding the numeric id resolved for this role
    pub fn id_key(&self) -> SessionKey {
        match self {
            Self::Patient => SessionKey::PatientId,
            Self::Doctor => SessionKey::DoctorId,
            Self::Nurse => SessionKey::NurseId,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Self::Patient),
            "doctor" => Ok(Self::Doctor),
            "nurse" => Ok(Self::Nurse),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}
