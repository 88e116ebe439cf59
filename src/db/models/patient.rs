//! Patient records.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Patient {
    pub patient_id: i64,
    pub fname: String,
    pub minit: Option<String>,
    pub lname: String,
    pub email: String,
    pub phone_no: Option<String>,
    pub dob: Option<String>,
    pub insurance: Option<String>,
    /// Doctor the patient sees by default, if one has been assigned
    pub primary_doc_id: Option<i64>,
}

impl Patient {
    /// "First M Last", skipping the middle initial when it is blank
    pub fn full_name(&self) -> String {
        match self.minit.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => format!("{} {} {}", self.fname, m, self.lname),
            _ => format!("{} {}", self.fname, self.lname),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(minit: Option<&str>) -> Patient {
        Patient {
            patient_id: 7,
            fname: "Grace".to_string(),
            minit: minit.map(str::to_string),
            lname: "Green".to_string(),
            email: "grace.green@email.com".to_string(),
            phone_no: None,
            dob: None,
            insurance: None,
            primary_doc_id: None,
        }
    }

    #[test]
    fn test_full_name_with_middle_initial() {
        assert_eq!(patient(Some("L")).full_name(), "Grace L Green");
    }

    #[test]
    fn test_full_name_without_middle_initial() {
        assert_eq!(patient(None).full_name(), "Grace Green");
        assert_eq!(patient(Some("  ")).full_name(), "Grace Green");
    }
}
