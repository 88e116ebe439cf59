//! Appointment booking form.

use serde::Deserialize;

use super::{optional, parse_datetime_local, FieldErrors};
use crate::db::NewAppointment;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppointmentForm {
    #[serde(rename = "ApptReason")]
    pub appt_reason: String,
    #[serde(rename = "ApptDateTime")]
    pub appt_date_time: String,
    #[serde(rename = "DoctorID")]
    pub doctor_id: String,
    #[serde(rename = "ApptNotes")]
    pub appt_notes: String,
}

impl AppointmentForm {
    pub fn validate(&self, patient_id: i64) -> Result<NewAppointment, FieldErrors> {
        let mut errors = FieldErrors::new();

        let reason = errors.require("ApptReason", &self.appt_reason);
        let when = errors.require("ApptDateTime", &self.appt_date_time);
        let doctor_id = errors.require_id("DoctorID", &self.doctor_id);

        let when = when.and_then(|raw| match parse_datetime_local(&raw) {
            Some(dt) => Some(dt.format("%Y-%m-%dT%H:%M").to_string()),
            None => {
                errors.add("ApptDateTime", "Invalid date and time");
                None
            }
        });

        errors.finish(|| {
            Some(NewAppointment {
                patient_id,
                doctor_id: doctor_id?,
                appt_date_time: when?,
                appt_reason: reason?,
                appt_notes: optional(&self.appt_notes),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::REQUIRED_MESSAGE;

    fn form(reason: &str, when: &str, doctor: &str) -> AppointmentForm {
        AppointmentForm {
            appt_reason: reason.to_string(),
            appt_date_time: when.to_string(),
            doctor_id: doctor.to_string(),
            appt_notes: String::new(),
        }
    }

    #[test]
    fn test_valid_booking() {
        let appt = form(" Checkup ", "2025-04-01T10:15", "2").validate(7).unwrap();

        assert_eq!(
            appt,
            NewAppointment {
                patient_id: 7,
                doctor_id: 2,
                appt_date_time: "2025-04-01T10:15".to_string(),
                appt_reason: "Checkup".to_string(),
                appt_notes: None,
            }
        );
    }

    #[test]
    fn test_blank_reason_is_flagged() {
        let errors = form("   ", "2025-04-01T10:15", "2").validate(7).unwrap_err();

        assert!(errors.has("ApptReason"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.message(), REQUIRED_MESSAGE);
    }

    #[test]
    fn test_bad_datetime() {
        let errors = form("Checkup", "tomorrow", "2").validate(7).unwrap_err();

        assert!(errors.has("ApptDateTime"));
        assert_eq!(errors.message(), "Invalid date and time");
    }
}
