//! Lab result entry form.

use serde::Deserialize;

use super::FieldErrors;
use crate::db::LabResultEntry;

/// `TestType`, `PatientID` and `DoctorID` are copied from the selected order
/// for display and are never written back.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabResultForm {
    #[serde(rename = "LabResID")]
    pub lab_res_id: String,
    #[serde(rename = "TestType")]
    pub test_type: String,
    #[serde(rename = "PatientID")]
    pub patient_id: String,
    #[serde(rename = "DoctorID")]
    pub doctor_id: String,
    #[serde(rename = "TestDate")]
    pub test_date: String,
    #[serde(rename = "ResultNotes")]
    pub result_notes: String,
}

impl LabResultForm {
    pub fn validate(&self, nurse_id: i64) -> Result<LabResultEntry, FieldErrors> {
        let mut errors = FieldErrors::new();

        let lab_res_id = errors.require_id("LabResID", &self.lab_res_id);
        let test_date = errors.require_date("TestDate", &self.test_date);
        let notes = errors.require("ResultNotes", &self.result_notes);

        errors.finish(|| {
            Some(LabResultEntry {
                lab_res_id: lab_res_id?,
                nurse_id,
                test_date: test_date?.format("%Y-%m-%d").to_string(),
                result_notes: notes?,
            })
        })
    }

    pub fn selected_order(&self) -> Option<i64> {
        super::parse_id(&self.lab_res_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_fields_are_optional() {
        let form = LabResultForm {
            lab_res_id: "200".to_string(),
            test_date: "2025-03-05".to_string(),
            result_notes: "LDL 130".to_string(),
            ..Default::default()
        };

        let entry = form.validate(3).unwrap();

        assert_eq!(
            entry,
            LabResultEntry {
                lab_res_id: 200,
                nurse_id: 3,
                test_date: "2025-03-05".to_string(),
                result_notes: "LDL 130".to_string(),
            }
        );
    }

    #[test]
    fn test_blank_notes_rejected() {
        let form = LabResultForm {
            lab_res_id: "200".to_string(),
            test_date: "2025-03-05".to_string(),
            result_notes: " \n ".to_string(),
            ..Default::default()
        };

        let errors = form.validate(3).unwrap_err();

        assert!(errors.has("ResultNotes"));
        assert_eq!(errors.len(), 1);
    }
}
