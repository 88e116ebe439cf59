//! Lab result models.
//!
//! A row starts life as an order placed by a doctor (`result_notes` and
//! `nurse_id` both null). A nurse conducts the test and records notes, which
//! moves the row to [`LabStatus::Conducted`] and attributes it to that nurse.
//! The store only applies that update to rows that are still ordered.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LabResult {
    pub lab_res_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub nurse_id: Option<i64>,
    pub test_type: String,
    pub test_date: String,
    pub result_notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabStatus {
    /// Ordered by a doctor, no result recorded yet
    Ordered,
    /// Result notes recorded, by the given nurse when known
    Conducted { nurse_id: Option<i64> },
}

impl LabResult {
    pub fn status(&self) -> LabStatus {
        match self.result_notes {
            None => LabStatus::Ordered,
            Some(_) => LabStatus::Conducted {
                nurse_id: self.nurse_id,
            },
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status() == LabStatus::Ordered
    }
}

/// Lab test ordered by a doctor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLabOrder {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub test_type: String,
    pub test_date: String,
}

/// Result recorded by a nurse against an existing order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabResultEntry {
    pub lab_res_id: i64,
    pub nurse_id: i64,
    pub test_date: String,
    pub result_notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lab(notes: Option<&str>, nurse_id: Option<i64>) -> LabResult {
        LabResult {
            lab_res_id: 1,
            patient_id: 2,
            doctor_id: 3,
            nurse_id,
            test_type: "CBC".to_string(),
            test_date: "2025-03-01".to_string(),
            result_notes: notes.map(str::to_string),
        }
    }

    #[test]
    fn test_null_notes_is_ordered() {
        let result = lab(None, None);
        assert_eq!(result.status(), LabStatus::Ordered);
        assert!(result.is_pending());
    }

    #[test]
    fn test_recorded_notes_is_conducted() {
        let result = lab(Some("Normal ranges"), Some(16));
        assert_eq!(
            result.status(),
            LabStatus::Conducted { nurse_id: Some(16) }
        );
        assert!(!result.is_pending());
    }

    #[test]
    fn test_empty_notes_still_count_as_recorded() {
        assert!(!lab(Some(""), None).is_pending());
    }
}
