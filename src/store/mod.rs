//! The clinic data layer.
//!
//! Dashboards never talk to the database directly; they go through
//! [`ClinicStore`], which covers the table-level reads and writes the portal
//! needs. [`SqliteStore`] is the production implementation.

mod sqlite;
#[cfg(test)]
pub mod testing;

pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::db::{
    Appointment, DoctorProfile, LabResult, LabResultEntry, NewAppointment, NewLabOrder,
    NewTreatment, NurseProfile, Patient, PersonName, Treatment, User,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),
    /// A write referenced a missing row or collided with an existing one
    #[error("{0}")]
    Constraint(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let msg = db_err.message();
            if msg.contains("FOREIGN KEY constraint failed") {
                return StoreError::Constraint("Referenced record does not exist".to_string());
            }
            if msg.contains("UNIQUE constraint failed") {
                return StoreError::Constraint("A record with this identifier already exists".to_string());
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Tables whose rows can be resolved to a display name by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Doctor,
    Patient,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Doctor => "Doctor",
            Self::Patient => "Patient",
        }
    }
}

#[async_trait]
pub trait ClinicStore: Send + Sync {
    async fn find_user(&self, email: &str) -> StoreResult<Option<User>>;

    // Identity lookups by login email
    async fn find_patient_by_email(&self, email: &str) -> StoreResult<Option<Patient>>;
    async fn find_doctor_by_email(&self, email: &str) -> StoreResult<Option<DoctorProfile>>;
    async fn find_nurse_by_email(&self, email: &str) -> StoreResult<Option<NurseProfile>>;

    async fn get_patient(&self, patient_id: i64) -> StoreResult<Option<Patient>>;
    async fn list_patients(&self) -> StoreResult<Vec<Patient>>;
    async fn get_doctor(&self, doctor_id: i64) -> StoreResult<Option<DoctorProfile>>;
    async fn list_doctors(&self) -> StoreResult<Vec<DoctorProfile>>;
    async fn get_nurse(&self, nurse_id: i64) -> StoreResult<Option<NurseProfile>>;

    /// Batch lookup of display names; ids with no row are simply absent
    async fn names(&self, kind: EntityKind, ids: &[i64]) -> StoreResult<Vec<PersonName>>;

    async fn get_appointment(&self, appointment_id: i64) -> StoreResult<Option<Appointment>>;
    async fn appointments_for_patient(&self, patient_id: i64) -> StoreResult<Vec<Appointment>>;
    async fn appointments_for_doctor(&self, doctor_id: i64) -> StoreResult<Vec<Appointment>>;

    async fn get_lab_result(&self, lab_res_id: i64) -> StoreResult<Option<LabResult>>;
    async fn lab_results_for_patient(&self, patient_id: i64) -> StoreResult<Vec<LabResult>>;
    /// Every ordered test still waiting for a result
    async fn pending_lab_results(&self) -> StoreResult<Vec<LabResult>>;
    async fn completed_lab_results_for_nurse(&self, nurse_id: i64) -> StoreResult<Vec<LabResult>>;

    async fn treatments_for_patient(&self, patient_id: i64) -> StoreResult<Vec<Treatment>>;

    async fn insert_appointment(&self, appointment: &NewAppointment) -> StoreResult<i64>;
    /// Returns false when no appointment with that id belongs to the doctor
    async fn complete_appointment(&self, appointment_id: i64, doctor_id: i64) -> StoreResult<bool>;
    /// Returns false when no appointment with that id belongs to the patient
    async fn delete_appointment(&self, appointment_id: i64, patient_id: i64) -> StoreResult<bool>;
    async fn insert_lab_order(&self, order: &NewLabOrder) -> StoreResult<i64>;
    /// Moves an ordered test to conducted; false if it was not pending
    async fn record_lab_result(&self, entry: &LabResultEntry) -> StoreResult<bool>;
    async fn insert_treatment(&self, treatment: &NewTreatment) -> StoreResult<i64>;
}
