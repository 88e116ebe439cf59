use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use super::{ClinicStore, EntityKind, StoreResult};
use crate::db::{
    Appointment, DbPool, DoctorProfile, LabResult, LabResultEntry, NewAppointment, NewLabOrder,
    NewTreatment, NurseProfile, Patient, PersonName, Treatment, User,
};

const DOCTOR_COLUMNS: &str = r#"
    SELECT d.doctor_id, s.fname, s.lname, s.email, s.phone_no, d.specialization
    FROM doctor d
    JOIN staff s ON s.staff_id = d.doctor_id
"#;

const NURSE_COLUMNS: &str = r#"
    SELECT n.nurse_id, s.fname, s.lname, s.email, s.phone_no, n.shift_type, n.ward
    FROM nurse n
    JOIN staff s ON s.staff_id = n.nurse_id
"#;

#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClinicStore for SqliteStore {
    async fn find_user(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_patient_by_email(&self, email: &str) -> StoreResult<Option<Patient>> {
        let patient = sqlx::query_as::<_, Patient>("SELECT * FROM patient WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(patient)
    }

    async fn find_doctor_by_email(&self, email: &str) -> StoreResult<Option<DoctorProfile>> {
        let doctor = sqlx::query_as::<_, DoctorProfile>(&format!("{} WHERE s.email = ?", DOCTOR_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doctor)
    }

    async fn find_nurse_by_email(&self, email: &str) -> StoreResult<Option<NurseProfile>> {
        let nurse = sqlx::query_as::<_, NurseProfile>(&format!("{} WHERE s.email = ?", NURSE_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(nurse)
    }

    async fn get_patient(&self, patient_id: i64) -> StoreResult<Option<Patient>> {
        let patient = sqlx::query_as::<_, Patient>("SELECT * FROM patient WHERE patient_id = ?")
            .bind(patient_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(patient)
    }

    async fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        let patients = sqlx::query_as::<_, Patient>("SELECT * FROM patient ORDER BY patient_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(patients)
    }

    async fn get_doctor(&self, doctor_id: i64) -> StoreResult<Option<DoctorProfile>> {
        let doctor = sqlx::query_as::<_, DoctorProfile>(&format!("{} WHERE d.doctor_id = ?", DOCTOR_COLUMNS))
            .bind(doctor_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doctor)
    }

    async fn list_doctors(&self) -> StoreResult<Vec<DoctorProfile>> {
        let doctors = sqlx::query_as::<_, DoctorProfile>(&format!(
            "{} ORDER BY s.lname, s.fname",
            DOCTOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(doctors)
    }

    async fn get_nurse(&self, nurse_id: i64) -> StoreResult<Option<NurseProfile>> {
        let nurse = sqlx::query_as::<_, NurseProfile>(&format!("{} WHERE n.nurse_id = ?", NURSE_COLUMNS))
            .bind(nurse_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(nurse)
    }

    async fn names(&self, kind: EntityKind, ids: &[i64]) -> StoreResult<Vec<PersonName>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(match kind {
            EntityKind::Doctor => {
                "SELECT s.staff_id AS id, s.fname, s.lname FROM doctor d \
                 JOIN staff s ON s.staff_id = d.doctor_id WHERE d.doctor_id IN ("
            }
            EntityKind::Patient => {
                "SELECT patient_id AS id, fname, lname FROM patient WHERE patient_id IN ("
            }
        });
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let names = query
            .build_query_as::<PersonName>()
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    async fn get_appointment(&self, appointment_id: i64) -> StoreResult<Option<Appointment>> {
        let appointment =
            sqlx::query_as::<_, Appointment>("SELECT * FROM appointment WHERE appointment_id = ?")
                .bind(appointment_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(appointment)
    }

    async fn appointments_for_patient(&self, patient_id: i64) -> StoreResult<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointment WHERE patient_id = ? ORDER BY appt_date_time, appointment_id",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(appointments)
    }

    async fn appointments_for_doctor(&self, doctor_id: i64) -> StoreResult<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointment WHERE doctor_id = ? ORDER BY appt_date_time, appointment_id",
        )
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(appointments)
    }

    async fn get_lab_result(&self, lab_res_id: i64) -> StoreResult<Option<LabResult>> {
        let result =
            sqlx::query_as::<_, LabResult>("SELECT * FROM lab_results WHERE lab_res_id = ?")
                .bind(lab_res_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(result)
    }

    async fn lab_results_for_patient(&self, patient_id: i64) -> StoreResult<Vec<LabResult>> {
        let results = sqlx::query_as::<_, LabResult>(
            "SELECT * FROM lab_results WHERE patient_id = ? ORDER BY test_date, lab_res_id",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(results)
    }

    async fn pending_lab_results(&self) -> StoreResult<Vec<LabResult>> {
        let results = sqlx::query_as::<_, LabResult>(
            "SELECT * FROM lab_results WHERE result_notes IS NULL ORDER BY test_date, lab_res_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(results)
    }

    async fn completed_lab_results_for_nurse(&self, nurse_id: i64) -> StoreResult<Vec<LabResult>> {
        let results = sqlx::query_as::<_, LabResult>(
            r#"
            SELECT * FROM lab_results
            WHERE nurse_id = ? AND result_notes IS NOT NULL
            ORDER BY test_date, lab_res_id
            "#,
        )
        .bind(nurse_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(results)
    }

    async fn treatments_for_patient(&self, patient_id: i64) -> StoreResult<Vec<Treatment>> {
        let treatments = sqlx::query_as::<_, Treatment>(
            "SELECT * FROM treatment WHERE patient_id = ? ORDER BY start_date, treatment_id",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(treatments)
    }

    async fn insert_appointment(&self, appointment: &NewAppointment) -> StoreResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO appointment (patient_id, doctor_id, appt_date_time, appt_reason, is_completed, appt_notes)
            VALUES (?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(appointment.patient_id)
        .bind(appointment.doctor_id)
        .bind(&appointment.appt_date_time)
        .bind(&appointment.appt_reason)
        .bind(&appointment.appt_notes)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn complete_appointment(&self, appointment_id: i64, doctor_id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE appointment SET is_completed = 1 WHERE appointment_id = ? AND doctor_id = ?",
        )
        .bind(appointment_id)
        .bind(doctor_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete_appointment(&self, appointment_id: i64, patient_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM appointment WHERE appointment_id = ? AND patient_id = ?")
            .bind(appointment_id)
            .bind(patient_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn insert_lab_order(&self, order: &NewLabOrder) -> StoreResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO lab_results (patient_id, doctor_id, nurse_id, test_type, test_date, result_notes)
            VALUES (?, ?, NULL, ?, ?, NULL)
            "#,
        )
        .bind(order.patient_id)
        .bind(order.doctor_id)
        .bind(&order.test_type)
        .bind(&order.test_date)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn record_lab_result(&self, entry: &LabResultEntry) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE lab_results
            SET result_notes = ?, test_date = ?, nurse_id = ?
            WHERE lab_res_id = ? AND result_notes IS NULL
            "#,
        )
        .bind(&entry.result_notes)
        .bind(&entry.test_date)
        .bind(entry.nurse_id)
        .bind(entry.lab_res_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn insert_treatment(&self, treatment: &NewTreatment) -> StoreResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO treatment (patient_id, doctor_id, treatment_type, start_date, end_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(treatment.patient_id)
        .bind(treatment.doctor_id)
        .bind(&treatment.treatment_type)
        .bind(&treatment.start_date)
        .bind(&treatment.end_date)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }
}
