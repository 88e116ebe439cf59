//! Patient dashboard fetchers.

use crate::join::{fallback_label, resolve_names, EntityKind};
use crate::store::ClinicStore;
use tracing::warn;

use super::{format_date, format_datetime, or_dash, or_na, primary_rows, PanelView, TableView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryDoctorPanel {
    pub name: String,
    pub specialization: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRow {
    pub appointment_id: i64,
    pub when: String,
    pub doctor: String,
    pub reason: String,
    pub status: &'static str,
    pub notes: String,
    pub can_cancel: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabResultRow {
    pub test_type: String,
    pub date: String,
    pub doctor: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatmentRow {
    pub treatment_type: String,
    pub doctor: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorOption {
    pub id: i64,
    pub label: String,
}

/// The patient's primary doctor.
///
/// `cached_doctor_id` is the `primaryDoctorID` session value captured during
/// identity resolution; when present the patient row is not re-read.
pub async fn primary_doctor(
    store: &dyn ClinicStore,
    patient_id: Option<i64>,
    cached_doctor_id: Option<i64>,
) -> PanelView<PrimaryDoctorPanel> {
    let Some(patient_id) = patient_id else {
        return PanelView::LoginRequired;
    };

    let doctor_id = match cached_doctor_id {
        Some(id) => id,
        None => match store.get_patient(patient_id).await {
            Ok(Some(patient)) => match patient.primary_doc_id {
                Some(id) => id,
                None => return PanelView::Missing,
            },
            Ok(None) => return PanelView::Missing,
            Err(e) => {
                warn!(patient_id, error = %e, "Failed to load patient record");
                return PanelView::Unavailable;
            }
        },
    };

    match store.get_doctor(doctor_id).await {
        Ok(Some(doctor)) => PanelView::Ready(PrimaryDoctorPanel {
            name: doctor.full_name(),
            specialization: or_na(doctor.specialization.as_deref()),
            contact: match doctor.phone_no.as_deref().map(str::trim) {
                Some(phone) if !phone.is_empty() => format!("{} | {}", doctor.email, phone),
                _ => doctor.email,
            },
        }),
        Ok(None) => PanelView::Ready(PrimaryDoctorPanel {
            name: fallback_label(EntityKind::Doctor, doctor_id),
            specialization: "N/A".to_string(),
            contact: "-".to_string(),
        }),
        Err(e) => {
            warn!(doctor_id, error = %e, "Failed to load primary doctor");
            PanelView::Unavailable
        }
    }
}

pub async fn appointments(store: &dyn ClinicStore, patient_id: Option<i64>) -> TableView<AppointmentRow> {
    let Some(patient_id) = patient_id else {
        return TableView::LoginRequired;
    };
    let appointments = match primary_rows(store.appointments_for_patient(patient_id).await, "appointments") {
        Ok(rows) => rows,
        Err(view) => return view,
    };

    let doctors = resolve_names(store, EntityKind::Doctor, appointments.iter().map(|a| a.doctor_id)).await;
    TableView::Rows(
        appointments
            .into_iter()
            .map(|appt| AppointmentRow {
                appointment_id: appt.appointment_id,
                when: format_datetime(&appt.appt_date_time),
                doctor: doctors.label(appt.doctor_id),
                status: appt.status_label(),
                notes: or_dash(appt.appt_notes.as_deref()),
                can_cancel: !appt.is_completed,
                reason: appt.appt_reason,
            })
            .collect(),
    )
}

pub async fn lab_results(store: &dyn ClinicStore, patient_id: Option<i64>) -> TableView<LabResultRow> {
    let Some(patient_id) = patient_id else {
        return TableView::LoginRequired;
    };
    let results = match primary_rows(store.lab_results_for_patient(patient_id).await, "lab results") {
        Ok(rows) => rows,
        Err(view) => return view,
    };

    let doctors = resolve_names(store, EntityKind::Doctor, results.iter().map(|r| r.doctor_id)).await;
    TableView::Rows(
        results
            .into_iter()
            .map(|result| LabResultRow {
                date: format_date(&result.test_date),
                doctor: doctors.label(result.doctor_id),
                notes: or_dash(result.result_notes.as_deref()),
                test_type: result.test_type,
            })
            .collect(),
    )
}

pub async fn treatments(store: &dyn ClinicStore, patient_id: Option<i64>) -> TableView<TreatmentRow> {
    let Some(patient_id) = patient_id else {
        return TableView::LoginRequired;
    };
    let treatments = match primary_rows(store.treatments_for_patient(patient_id).await, "treatments") {
        Ok(rows) => rows,
        Err(view) => return view,
    };

    let doctors = resolve_names(store, EntityKind::Doctor, treatments.iter().map(|t| t.doctor_id)).await;
    TableView::Rows(
        treatments
            .into_iter()
            .map(|treatment| TreatmentRow {
                doctor: doctors.label(treatment.doctor_id),
                start: format_date(&treatment.start_date),
                end: match treatment.end_date.as_deref() {
                    Some(end) => format_date(end),
                    None => "Ongoing".to_string(),
                },
                treatment_type: treatment.treatment_type,
            })
            .collect(),
    )
}

/// Choices for the booking form's doctor select
pub async fn doctor_options(store: &dyn ClinicStore, patient_id: Option<i64>) -> Vec<DoctorOption> {
    if patient_id.is_none() {
        return Vec::new();
    }
    match store.list_doctors().await {
        Ok(doctors) => doctors
            .into_iter()
            .map(|doctor| DoctorOption {
                id: doctor.doctor_id,
                label: match doctor.specialization.as_deref() {
                    Some(specialization) if !specialization.trim().is_empty() => {
                        format!("Dr. {} ({})", doctor.full_name(), specialization)
                    }
                    _ => format!("Dr. {}", doctor.full_name()),
                },
            })
            .collect(),
        Err(e) => {
            warn!(error = %e, "Failed to load doctor list");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{fixture_store, ids, CountingStore, FailingStore};

    #[tokio::test]
    async fn test_missing_identity_issues_no_calls() {
        let store = CountingStore::new(fixture_store().await);

        assert_eq!(primary_doctor(&store, None, None).await, PanelView::LoginRequired);
        assert_eq!(appointments(&store, None).await, TableView::LoginRequired);
        assert_eq!(lab_results(&store, None).await, TableView::LoginRequired);
        assert_eq!(treatments(&store, None).await, TableView::LoginRequired);
        assert!(doctor_options(&store, None).await.is_empty());
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_unassigned_primary_doctor_stops_after_patient_read() {
        let store = CountingStore::new(fixture_store().await);

        let panel = primary_doctor(&store, Some(ids::PATIENT_GRACE), None).await;

        assert_eq!(panel, PanelView::Missing);
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_primary_doctor_panel() {
        let store = fixture_store().await;

        let panel = primary_doctor(&store, Some(ids::PATIENT_BOB), None).await;

        assert_eq!(
            panel,
            PanelView::Ready(PrimaryDoctorPanel {
                name: "Sarah Johnson".to_string(),
                specialization: "Cardiology".to_string(),
                contact: "sarah.johnson@mediconnect.com | 555-0102".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_cached_primary_doctor_skips_patient_read() {
        let store = CountingStore::new(fixture_store().await);

        let panel = primary_doctor(&store, Some(ids::PATIENT_BOB), Some(ids::DR_JOHNSON)).await;

        assert!(matches!(panel, PanelView::Ready(_)));
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_appointments_resolve_doctor_names() {
        let store = CountingStore::new(fixture_store().await);

        let view = appointments(&store, Some(ids::PATIENT_GRACE)).await;
        let rows = view.rows();

        assert_eq!(rows.len(), 2);
        // ordered by date: the completed February visit comes first
        assert_eq!(rows[0].appointment_id, ids::APPT_GRACE_DONE);
        assert_eq!(rows[0].doctor, "Sarah Johnson");
        assert_eq!(rows[0].status, "Completed");
        assert_eq!(rows[0].notes, "BP normal");
        assert!(!rows[0].can_cancel);
        assert_eq!(rows[1].doctor, "John Smith");
        assert_eq!(rows[1].when, "03/10/2025, 9:30 AM");
        assert_eq!(rows[1].notes, "-");
        assert!(rows[1].can_cancel);
        // one primary read plus one batched name lookup
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_treatments_show_ongoing() {
        let store = fixture_store().await;

        let view = treatments(&store, Some(ids::PATIENT_GRACE)).await;
        let rows = view.rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].end, "02/10/2025");
        assert_eq!(rows[1].treatment_type, "Statins");
        assert_eq!(rows[1].end, "Ongoing");
    }

    #[tokio::test]
    async fn test_lab_results_for_patient_without_rows() {
        let store = fixture_store().await;

        assert_eq!(lab_results(&store, Some(999)).await, TableView::Empty);
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable() {
        let store = FailingStore;

        assert_eq!(appointments(&store, Some(1)).await, TableView::Unavailable);
        assert_eq!(treatments(&store, Some(1)).await, TableView::Unavailable);
        assert_eq!(primary_doctor(&store, Some(1), None).await, PanelView::Unavailable);
        assert!(doctor_options(&store, Some(1)).await.is_empty());
    }

    #[tokio::test]
    async fn test_doctor_options_label_specialization() {
        let store = fixture_store().await;

        let options = doctor_options(&store, Some(ids::PATIENT_GRACE)).await;

        assert_eq!(options.len(), 2);
        // ordered by last name
        assert_eq!(options[0].label, "Dr. Sarah Johnson (Cardiology)");
        assert_eq!(options[1].label, "Dr. John Smith (Family Medicine)");
    }
}
