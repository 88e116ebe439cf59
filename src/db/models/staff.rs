//! Doctor and nurse profiles, each joined with its staff identity.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A doctor row joined with its staff identity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DoctorProfile {
    pub doctor_id: i64,
    pub fname: String,
    pub lname: String,
    pub email: String,
    pub phone_no: Option<String>,
    pub specialization: Option<String>,
}

impl DoctorProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.fname, self.lname)
    }
}

/// A nurse row joined with its staff identity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NurseProfile {
    pub nurse_id: i64,
    pub fname: String,
    pub lname: String,
    pub email: String,
    pub phone_no: Option<String>,
    pub shift_type: Option<String>,
    pub ward: Option<String>,
}

/// Minimal projection used when resolving foreign ids to display names
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PersonName {
    pub id: i64,
    pub fname: String,
    pub lname: String,
}

impl PersonName {
    pub fn display(&self) -> String {
        format!("{} {}", self.fname, self.lname)
    }
}
