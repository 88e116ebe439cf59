//! Shared fixtures for store-backed tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ClinicStore, EntityKind, SqliteStore, StoreError, StoreResult};
use crate::auth::hash_password;
use crate::db::{
    init_in_memory, Appointment, DoctorProfile, LabResult, LabResultEntry, NewAppointment,
    NewLabOrder, NewTreatment, NurseProfile, Patient, PersonName, Treatment, User,
};

pub mod ids {
    pub const DR_SMITH: i64 = 1;
    pub const DR_JOHNSON: i64 = 2;
    pub const NURSE_BROWN: i64 = 3;
    pub const NURSE_JONES: i64 = 4;
    pub const PATIENT_GRACE: i64 = 7;
    pub const PATIENT_BOB: i64 = 8;
    pub const APPT_GRACE: i64 = 100;
    pub const APPT_GRACE_DONE: i64 = 101;
    pub const APPT_BOB: i64 = 102;
    pub const LAB_PENDING: i64 = 200;
    pub const LAB_BY_BROWN: i64 = 201;
    pub const LAB_BY_JONES: i64 = 202;
}

const FIXTURE_SQL: &str = r#"
INSERT INTO staff (staff_id, fname, lname, email, phone_no) VALUES
    (1, 'John', 'Smith', 'john.smith@mediconnect.com', '555-0101'),
    (2, 'Sarah', 'Johnson', 'sarah.johnson@mediconnect.com', '555-0102'),
    (3, 'Emily', 'Brown', 'emily.brown@mediconnect.com', '555-0201'),
    (4, 'David', 'Jones', 'david.jones@mediconnect.com', '555-0202');
INSERT INTO doctor (doctor_id, specialization) VALUES (1, 'Family Medicine'), (2, 'Cardiology');
INSERT INTO nurse (nurse_id, shift_type, ward) VALUES (3, 'Day', 'General'), (4, 'Night', NULL);
INSERT INTO patient (patient_id, fname, minit, lname, email, phone_no, dob, insurance, primary_doc_id) VALUES
    (7, 'Grace', NULL, 'Green', 'grace.green@email.com', '555-1007', '1998-08-08', NULL, NULL),
    (8, 'Bob', 'T', 'Baker', 'bob.baker@email.com', '555-1002', '1979-09-30', 'Aetna', 2);
INSERT INTO appointment (appointment_id, patient_id, doctor_id, appt_date_time, appt_reason, is_completed, appt_notes) VALUES
    (100, 7, 1, '2025-03-10T09:30', 'Annual checkup', 0, NULL),
    (101, 7, 2, '2025-02-01T14:00', 'Chest pain follow-up', 1, 'BP normal'),
    (102, 8, 2, '2025-03-12T11:00', 'Palpitations', 0, NULL);
INSERT INTO lab_results (lab_res_id, patient_id, doctor_id, nurse_id, test_type, test_date, result_notes) VALUES
    (200, 8, 2, NULL, 'Lipid Panel', '2025-03-02', NULL),
    (201, 7, 1, 3, 'CBC', '2025-02-15', 'Normal'),
    (202, 8, 2, 4, 'Glucose', '2025-02-20', 'Fasting 92 mg/dL');
INSERT INTO treatment (treatment_id, patient_id, doctor_id, treatment_type, start_date, end_date) VALUES
    (300, 7, 1, 'Physical therapy', '2025-01-10', '2025-02-10'),
    (301, 7, 2, 'Statins', '2025-02-01', NULL)
"#;

/// In-memory store holding a small clinic plus three login accounts
pub async fn fixture_store() -> SqliteStore {
    let pool = init_in_memory().await.expect("in-memory database");
    for statement in FIXTURE_SQL.split(';') {
        sqlx::query(statement.trim())
            .execute(&pool)
            .await
            .expect("fixture row");
    }

    for (email, password, role) in [
        ("grace.green@email.com", "123r", "patient"),
        ("john.smith@mediconnect.com", "doc123", "doctor"),
        ("emily.brown@mediconnect.com", "nur123", "nurse"),
    ] {
        sqlx::query("INSERT INTO users (email, password, role) VALUES (?, ?, ?)")
            .bind(email)
            .bind(hash_password(password).expect("hash"))
            .bind(role)
            .execute(&pool)
            .await
            .expect("fixture user");
    }

    SqliteStore::new(pool)
}

/// Delegating store that counts every call made through it
pub struct CountingStore<S> {
    inner: S,
    calls: AtomicUsize,
}

impl<S: ClinicStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) -> &S {
        self.calls.fetch_add(1, Ordering::SeqCst);
        &self.inner
    }
}

#[async_trait]
impl<S: ClinicStore> ClinicStore for CountingStore<S> {
    async fn find_user(&self, email: &str) -> StoreResult<Option<User>> {
        self.hit().find_user(email).await
    }
    async fn find_patient_by_email(&self, email: &str) -> StoreResult<Option<Patient>> {
        self.hit().find_patient_by_email(email).await
    }
    async fn find_doctor_by_email(&self, email: &str) -> StoreResult<Option<DoctorProfile>> {
        self.hit().find_doctor_by_email(email).await
    }
    async fn find_nurse_by_email(&self, email: &str) -> StoreResult<Option<NurseProfile>> {
        self.hit().find_nurse_by_email(email).await
    }
    async fn get_patient(&self, patient_id: i64) -> StoreResult<Option<Patient>> {
        self.hit().get_patient(patient_id).await
    }
    async fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        self.hit().list_patients().await
    }
    async fn get_doctor(&self, doctor_id: i64) -> StoreResult<Option<DoctorProfile>> {
        self.hit().get_doctor(doctor_id).await
    }
    async fn list_doctors(&self) -> StoreResult<Vec<DoctorProfile>> {
        self.hit().list_doctors().await
    }
    async fn get_nurse(&self, nurse_id: i64) -> StoreResult<Option<NurseProfile>> {
        self.hit().get_nurse(nurse_id).await
    }
    async fn names(&self, kind: EntityKind, ids: &[i64]) -> StoreResult<Vec<PersonName>> {
        self.hit().names(kind, ids).await
    }
    async fn get_appointment(&self, appointment_id: i64) -> StoreResult<Option<Appointment>> {
        self.hit().get_appointment(appointment_id).await
    }
    async fn appointments_for_patient(&self, patient_id: i64) -> StoreResult<Vec<Appointment>> {
        self.hit().appointments_for_patient(patient_id).await
    }
    async fn appointments_for_doctor(&self, doctor_id: i64) -> StoreResult<Vec<Appointment>> {
        self.hit().appointments_for_doctor(doctor_id).await
    }
    async fn get_lab_result(&self, lab_res_id: i64) -> StoreResult<Option<LabResult>> {
        self.hit().get_lab_result(lab_res_id).await
    }
    async fn lab_results_for_patient(&self, patient_id: i64) -> StoreResult<Vec<LabResult>> {
        self.hit().lab_results_for_patient(patient_id).await
    }
    async fn pending_lab_results(&self) -> StoreResult<Vec<LabResult>> {
        self.hit().pending_lab_results().await
    }
    async fn completed_lab_results_for_nurse(&self, nurse_id: i64) -> StoreResult<Vec<LabResult>> {
        self.hit().completed_lab_results_for_nurse(nurse_id).await
    }
    async fn treatments_for_patient(&self, patient_id: i64) -> StoreResult<Vec<Treatment>> {
        self.hit().treatments_for_patient(patient_id).await
    }
    async fn insert_appointment(&self, appointment: &NewAppointment) -> StoreResult<i64> {
        self.hit().insert_appointment(appointment).await
    }
    async fn complete_appointment(&self, appointment_id: i64, doctor_id: i64) -> StoreResult<bool> {
        self.hit().complete_appointment(appointment_id, doctor_id).await
    }
    async fn delete_appointment(&self, appointment_id: i64, patient_id: i64) -> StoreResult<bool> {
        self.hit().delete_appointment(appointment_id, patient_id).await
    }
    async fn insert_lab_order(&self, order: &NewLabOrder) -> StoreResult<i64> {
        self.hit().insert_lab_order(order).await
    }
    async fn record_lab_result(&self, entry: &LabResultEntry) -> StoreResult<bool> {
        self.hit().record_lab_result(entry).await
    }
    async fn insert_treatment(&self, treatment: &NewTreatment) -> StoreResult<i64> {
        self.hit().insert_treatment(treatment).await
    }
}

/// Store whose every call fails, standing in for an unreachable backend
pub struct FailingStore;

fn unreachable_backend<T>() -> StoreResult<T> {
    Err(StoreError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl ClinicStore for FailingStore {
    async fn find_user(&self, _email: &str) -> StoreResult<Option<User>> {
        unreachable_backend()
    }
    async fn find_patient_by_email(&self, _email: &str) -> StoreResult<Option<Patient>> {
        unreachable_backend()
    }
    async fn find_doctor_by_email(&self, _email: &str) -> StoreResult<Option<DoctorProfile>> {
        unreachable_backend()
    }
    async fn find_nurse_by_email(&self, _email: &str) -> StoreResult<Option<NurseProfile>> {
        unreachable_backend()
    }
    async fn get_patient(&self, _patient_id: i64) -> StoreResult<Option<Patient>> {
        unreachable_backend()
    }
    async fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        unreachable_backend()
    }
    async fn get_doctor(&self, _doctor_id: i64) -> StoreResult<Option<DoctorProfile>> {
        unreachable_backend()
    }
    async fn list_doctors(&self) -> StoreResult<Vec<DoctorProfile>> {
        unreachable_backend()
    }
    async fn get_nurse(&self, _nurse_id: i64) -> StoreResult<Option<NurseProfile>> {
        unreachable_backend()
    }
    async fn names(&self, _kind: EntityKind, _ids: &[i64]) -> StoreResult<Vec<PersonName>> {
        unreachable_backend()
    }
    async fn get_appointment(&self, _appointment_id: i64) -> StoreResult<Option<Appointment>> {
        unreachable_backend()
    }
    async fn appointments_for_patient(&self, _patient_id: i64) -> StoreResult<Vec<Appointment>> {
        unreachable_backend()
    }
    async fn appointments_for_doctor(&self, _doctor_id: i64) -> StoreResult<Vec<Appointment>> {
        unreachable_backend()
    }
    async fn get_lab_result(&self, _lab_res_id: i64) -> StoreResult<Option<LabResult>> {
        unreachable_backend()
    }
    async fn lab_results_for_patient(&self, _patient_id: i64) -> StoreResult<Vec<LabResult>> {
        unreachable_backend()
    }
    async fn pending_lab_results(&self) -> StoreResult<Vec<LabResult>> {
        unreachable_backend()
    }
    async fn completed_lab_results_for_nurse(&self, _nurse_id: i64) -> StoreResult<Vec<LabResult>> {
        unreachable_backend()
    }
    async fn treatments_for_patient(&self, _patient_id: i64) -> StoreResult<Vec<Treatment>> {
        unreachable_backend()
    }
    async fn insert_appointment(&self, _appointment: &NewAppointment) -> StoreResult<i64> {
        unreachable_backend()
    }
    async fn complete_appointment(&self, _appointment_id: i64, _doctor_id: i64) -> StoreResult<bool> {
        unreachable_backend()
    }
    async fn delete_appointment(&self, _appointment_id: i64, _patient_id: i64) -> StoreResult<bool> {
        unreachable_backend()
    }
    async fn insert_lab_order(&self, _order: &NewLabOrder) -> StoreResult<i64> {
        unreachable_backend()
    }
    async fn record_lab_result(&self, _entry: &LabResultEntry) -> StoreResult<bool> {
        unreachable_backend()
    }
    async fn insert_treatment(&self, _treatment: &NewTreatment) -> StoreResult<i64> {
        unreachable_backend()
    }
}
