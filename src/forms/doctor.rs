//! Lab order and treatment forms.

use serde::Deserialize;

use super::{optional, FieldErrors};
use crate::db::{NewLabOrder, NewTreatment};

pub const END_BEFORE_START: &str = "End date must be after start date";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabOrderForm {
    #[serde(rename = "PatientID")]
    pub patient_id: String,
    #[serde(rename = "TestType")]
    pub test_type: String,
    #[serde(rename = "TestDate")]
    pub test_date: String,
}

impl LabOrderForm {
    /// The order always starts pending: no notes and no nurse
    pub fn validate(&self, doctor_id: i64) -> Result<NewLabOrder, FieldErrors> {
        let mut errors = FieldErrors::new();

        let patient_id = errors.require_id("PatientID", &self.patient_id);
        let test_type = errors.require("TestType", &self.test_type);
        let test_date = errors.require_date("TestDate", &self.test_date);

        errors.finish(|| {
            Some(NewLabOrder {
                patient_id: patient_id?,
                doctor_id,
                test_type: test_type?,
                test_date: test_date?.format("%Y-%m-%d").to_string(),
            })
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TreatmentForm {
    #[serde(rename = "PatientID")]
    pub patient_id: String,
    #[serde(rename = "TreatmentType")]
    pub treatment_type: String,
    #[serde(rename = "StartDate")]
    pub start_date: String,
    #[serde(rename = "EndDate")]
    pub end_date: String,
}

impl TreatmentForm {
    pub fn validate(&self, doctor_id: i64) -> Result<NewTreatment, FieldErrors> {
        let mut errors = FieldErrors::new();

        let patient_id = errors.require_id("PatientID", &self.patient_id);
        let treatment_type = errors.require("TreatmentType", &self.treatment_type);
        let start = errors.require_date("StartDate", &self.start_date);

        let end = match optional(&self.end_date) {
            Some(_) => errors.require_date("EndDate", &self.end_date),
            None => None,
        };
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                errors.add("EndDate", END_BEFORE_START);
            }
        }

        errors.finish(|| {
            Some(NewTreatment {
                patient_id: patient_id?,
                doctor_id,
                treatment_type: treatment_type?,
                start_date: start?.format("%Y-%m-%d").to_string(),
                end_date: end.map(|d| d.format("%Y-%m-%d").to_string()),
            })
        })
    }
}
