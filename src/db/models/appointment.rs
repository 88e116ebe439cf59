//! Appointment models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub appointment_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appt_date_time: String,
    pub appt_reason: String,
    pub is_completed: bool,
    pub appt_notes: Option<String>,
}

impl Appointment {
    pub fn status_label(&self) -> &'static str {
        if self.is_completed {
            "Completed"
        } else {
            "Pending"
        }
    }
}

/// Appointment booked from the patient dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appt_date_time: String,
    pub appt_reason: String,
    pub appt_notes: Option<String>,
}
