//! Nurse dashboard fetchers.

use crate::join::{resolve_names, EntityKind};
use crate::store::ClinicStore;
use tracing::warn;

use super::{format_date, or_dash, or_na, primary_rows, PanelView, TableView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NurseInfo {
    pub name: String,
    pub shift_type: String,
    pub ward: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLabRow {
    pub lab_res_id: i64,
    pub test_type: String,
    pub date: String,
    pub patient_id: i64,
    pub patient: String,
    pub doctor_id: i64,
    pub doctor: String,
}

/// Entry in the lab order select of the result form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabOrderOption {
    pub lab_res_id: i64,
    pub label: String,
    pub test_type: String,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedLabRow {
    pub lab_res_id: i64,
    pub test_type: String,
    pub date: String,
    pub patient: String,
    pub doctor: String,
    pub notes: String,
}

pub async fn info(store: &dyn ClinicStore, nurse_id: Option<i64>) -> PanelView<NurseInfo> {
    let Some(nurse_id) = nurse_id else {
        return PanelView::LoginRequired;
    };
    match store.get_nurse(nurse_id).await {
        Ok(Some(nurse)) => PanelView::Ready(NurseInfo {
            name: format!("{} {}", nurse.fname, nurse.lname),
            shift_type: or_na(nurse.shift_type.as_deref()),
            ward: or_na(nurse.ward.as_deref()),
        }),
        Ok(None) => PanelView::Missing,
        Err(e) => {
            warn!(nurse_id, error = %e, "Failed to load nurse record");
            PanelView::Unavailable
        }
    }
}

/// Every test still waiting for a result, plus the select options built
/// from the same rows. `selected` marks the order picked via "Conduct Test".
pub async fn pending_lab_results(
    store: &dyn ClinicStore,
    nurse_id: Option<i64>,
    selected: Option<i64>,
) -> (TableView<PendingLabRow>, Vec<LabOrderOption>) {
    if nurse_id.is_none() {
        return (TableView::LoginRequired, Vec::new());
    }
    let pending = match primary_rows(store.pending_lab_results().await, "pending lab results") {
        Ok(rows) => rows,
        Err(view) => return (view, Vec::new()),
    };

    let patients = resolve_names(store, EntityKind::Patient, pending.iter().map(|r| r.patient_id)).await;
    let doctors = resolve_names(store, EntityKind::Doctor, pending.iter().map(|r| r.doctor_id)).await;

    let options = pending
        .iter()
        .map(|r| LabOrderOption {
            lab_res_id: r.lab_res_id,
            label: format!(
                "{} - Patient ID: {} ({})",
                r.test_type,
                r.patient_id,
                format_date(&r.test_date)
            ),
            test_type: r.test_type.clone(),
            patient_id: r.patient_id,
            doctor_id: r.doctor_id,
            selected: selected == Some(r.lab_res_id),
        })
        .collect();
    let rows = pending
        .into_iter()
        .map(|r| PendingLabRow {
            lab_res_id: r.lab_res_id,
            date: format_date(&r.test_date),
            patient: patients.label(r.patient_id),
            doctor: doctors.label(r.doctor_id),
            patient_id: r.patient_id,
            doctor_id: r.doctor_id,
            test_type: r.test_type,
        })
        .collect();

    (TableView::Rows(rows), options)
}

/// Results this nurse has recorded
pub async fn completed_lab_results(
    store: &dyn ClinicStore,
    nurse_id: Option<i64>,
) -> TableView<CompletedLabRow> {
    let Some(nurse_id) = nurse_id else {
        return TableView::LoginRequired;
    };
    let results = match primary_rows(
        store.completed_lab_results_for_nurse(nurse_id).await,
        "completed lab results",
    ) {
        Ok(rows) => rows,
        Err(view) => return view,
    };

    let patients = resolve_names(store, EntityKind::Patient, results.iter().map(|r| r.patient_id)).await;
    let doctors = resolve_names(store, EntityKind::Doctor, results.iter().map(|r| r.doctor_id)).await;
    TableView::Rows(
        results
            .into_iter()
            .map(|r| CompletedLabRow {
                lab_res_id: r.lab_res_id,
                date: format_date(&r.test_date),
                patient: patients.label(r.patient_id),
                doctor: doctors.label(r.doctor_id),
                notes: or_dash(r.result_notes.as_deref()),
                test_type: r.test_type,
            })
            .collect(),
    )
}
