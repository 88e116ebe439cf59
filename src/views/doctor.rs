//! Doctor dashboard fetchers.

use crate::db::Patient;
use crate::join::{resolve_names, EntityKind};
use crate::store::ClinicStore;
use tracing::warn;

use super::{format_date, format_datetime, or_dash, or_na, primary_rows, PanelView, TableView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRow {
    pub patient_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dob: String,
    pub insurance: String,
}

impl PatientRow {
    fn from_patient(patient: &Patient) -> Self {
        Self {
            patient_id: patient.patient_id,
            name: patient.full_name(),
            email: patient.email.clone(),
            phone: or_dash(patient.phone_no.as_deref()),
            dob: patient
                .dob
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string()),
            insurance: or_na(patient.insurance.as_deref()),
        }
    }
}

/// Entry in the patient select of the lab-order and treatment forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientOption {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRow {
    pub appointment_id: i64,
    pub when: String,
    pub patient: String,
    pub reason: String,
    pub status: &'static str,
    pub notes: String,
    pub can_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatmentRow {
    pub treatment_type: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientDetail {
    pub patient: PatientRow,
    pub primary_doctor: String,
    /// Treatments this doctor has prescribed for the patient
    pub treatments: TableView<TreatmentRow>,
}

/// The patient table and the matching dropdown options, from one read
pub async fn patients(
    store: &dyn ClinicStore,
    doctor_id: Option<i64>,
) -> (TableView<PatientRow>, Vec<PatientOption>) {
    if doctor_id.is_none() {
        return (TableView::LoginRequired, Vec::new());
    }
    let patients = match primary_rows(store.list_patients().await, "patients") {
        Ok(rows) => rows,
        Err(view) => return (view, Vec::new()),
    };

    let options = patients
        .iter()
        .map(|p| PatientOption {
            id: p.patient_id,
            label: format!("{} {} (ID: {})", p.fname, p.lname, p.patient_id),
        })
        .collect();
    let rows = patients.iter().map(PatientRow::from_patient).collect();
    (TableView::Rows(rows), options)
}

pub async fn appointments(store: &dyn ClinicStore, doctor_id: Option<i64>) -> TableView<AppointmentRow> {
    let Some(doctor_id) = doctor_id else {
        return TableView::LoginRequired;
    };
    let appointments = match primary_rows(store.appointments_for_doctor(doctor_id).await, "appointments") {
        Ok(rows) => rows,
        Err(view) => return view,
    };

    let patients = resolve_names(store, EntityKind::Patient, appointments.iter().map(|a| a.patient_id)).await;
    TableView::Rows(
        appointments
            .into_iter()
            .map(|appt| AppointmentRow {
                appointment_id: appt.appointment_id,
                when: format_datetime(&appt.appt_date_time),
                patient: patients.label(appt.patient_id),
                status: appt.status_label(),
                notes: or_dash(appt.appt_notes.as_deref()),
                can_complete: !appt.is_completed,
                reason: appt.appt_reason,
            })
            .collect(),
    )
}

pub async fn patient_detail(
    store: &dyn ClinicStore,
    doctor_id: Option<i64>,
    patient_id: i64,
) -> PanelView<PatientDetail> {
    let Some(doctor_id) = doctor_id else {
        return PanelView::LoginRequired;
    };
    let patient = match store.get_patient(patient_id).await {
        Ok(Some(patient)) => patient,
        Ok(None) => return PanelView::Missing,
        Err(e) => {
            warn!(patient_id, error = %e, "Failed to load patient record");
            return PanelView::Unavailable;
        }
    };

    let primary_doctor = match patient.primary_doc_id {
        Some(id) => resolve_names(store, EntityKind::Doctor, [id]).await.label(id),
        None => "Not assigned".to_string(),
    };

    let treatments = match store.treatments_for_patient(patient_id).await {
        Ok(rows) => {
            let rows: Vec<TreatmentRow> = rows
                .into_iter()
                .filter(|t| t.doctor_id == doctor_id)
                .map(|t| TreatmentRow {
                    start: format_date(&t.start_date),
                    end: match t.end_date.as_deref() {
                        Some(end) => format_date(end),
                        None => "Ongoing".to_string(),
                    },
                    treatment_type: t.treatment_type,
                })
                .collect();
            if rows.is_empty() {
                TableView::Empty
            } else {
                TableView::Rows(rows)
            }
        }
        Err(e) => {
            warn!(patient_id, error = %e, "Failed to load treatments");
            TableView::Unavailable
        }
    };

    PanelView::Ready(PatientDetail {
        patient: PatientRow::from_patient(&patient),
        primary_doctor,
        treatments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{fixture_store, ids, CountingStore, FailingStore};

    #[tokio::test]
    async fn test_missing_identity_issues_no_calls() {
        let store = CountingStore::new(fixture_store().await);

        let (table, options) = patients(&store, None).await;
        assert_eq!(table, TableView::LoginRequired);
        assert!(options.is_empty());
        assert_eq!(appointments(&store, None).await, TableView::LoginRequired);
        assert_eq!(
            patient_detail(&store, None, ids::PATIENT_GRACE).await,
            PanelView::LoginRequired
        );
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_patient_table_and_options() {
        let store = fixture_store().await;

        let (table, options) = patients(&store, Some(ids::DR_SMITH)).await;
        let rows = table.rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Grace Green");
        assert_eq!(rows[0].insurance, "N/A");
        assert_eq!(rows[0].dob, "08/08/1998");
        assert_eq!(rows[1].name, "Bob T Baker");
        assert_eq!(options[0].label, "Grace Green (ID: 7)");
        assert_eq!(options[1].label, "Bob Baker (ID: 8)");
    }

    #[tokio::test]
    async fn test_appointments_resolve_patient_names() {
        let store = fixture_store().await;

        let view = appointments(&store, Some(ids::DR_JOHNSON)).await;
        let rows = view.rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].patient, "Grace Green");
        assert!(!rows[0].can_complete);
        assert_eq!(rows[1].appointment_id, ids::APPT_BOB);
        assert_eq!(rows[1].patient, "Bob Baker");
        assert!(rows[1].can_complete);
    }

    #[tokio::test]
    async fn test_patient_detail_filters_to_own_treatments() {
        let store = fixture_store().await;

        let detail = patient_detail(&store, Some(ids::DR_JOHNSON), ids::PATIENT_GRACE).await;

        let PanelView::Ready(detail) = detail else {
            panic!("expected detail, got {:?}", detail);
        };
        assert_eq!(detail.primary_doctor, "Not assigned");
        let rows = detail.treatments.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].treatment_type, "Statins");
    }

    #[tokio::test]
    async fn test_patient_detail_unknown_patient() {
        let store = fixture_store().await;

        assert_eq!(
            patient_detail(&store, Some(ids::DR_SMITH), 999).await,
            PanelView::Missing
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable() {
        let (table, _) = patients(&FailingStore, Some(1)).await;
        assert_eq!(table, TableView::Unavailable);
        assert_eq!(appointments(&FailingStore, Some(1)).await, TableView::Unavailable);
    }
}
