// Askama template definitions

use askama::Template;
use std::time::Duration;

use crate::db::Role;
use crate::forms::{AppointmentForm, FieldErrors, LabOrderForm, LabResultForm, TreatmentForm};
use crate::session::Banner;
use crate::views::doctor::{self, PatientRow};
use crate::views::nurse::{self, LabOrderOption, NurseInfo};
use crate::views::patient::{self, PrimaryDoctorPanel};
use crate::views::TableView;

/// A banner ready for the page, with the time it has left before it
/// removes itself
pub struct BannerView {
    pub kind: &'static str,
    pub message: String,
    pub dismiss_after_ms: u128,
}

impl BannerView {
    /// `None` once the banner has outlived `ttl`
    pub fn new(banner: &Banner, ttl: Duration) -> Option<Self> {
        let remaining = banner.remaining(ttl)?;
        Some(Self {
            kind: banner.kind.as_str(),
            message: banner.message.clone(),
            dismiss_after_ms: remaining.as_millis(),
        })
    }
}

/// `<option>` for a plain select
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(id: i64, label: impl Into<String>, current: &str) -> Self {
        let value = id.to_string();
        Self {
            selected: current.trim() == value,
            value,
            label: label.into(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub banner: Option<BannerView>,
    pub user_email: Option<String>,
    pub roles: Vec<Role>,
    pub dashboard: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub banner: Option<BannerView>,
    pub user_email: Option<String>,
    pub role_value: &'static str,
    pub role_title: &'static str,
    pub email: String,
}

#[derive(Template)]
#[template(path = "patient_dashboard.html")]
pub struct PatientDashboardTemplate {
    pub banner: Option<BannerView>,
    pub user_email: Option<String>,
    pub show_manual_id: bool,
    pub doctor_panel: Option<PrimaryDoctorPanel>,
    pub doctor_panel_message: Option<String>,
    pub appointment_rows: String,
    pub lab_rows: String,
    pub treatment_rows: String,
    pub doctor_options: Vec<SelectOption>,
    pub form: AppointmentForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "doctor_dashboard.html")]
pub struct DoctorDashboardTemplate {
    pub banner: Option<BannerView>,
    pub user_email: Option<String>,
    pub show_manual_id: bool,
    pub patient_rows: String,
    pub appointment_rows: String,
    pub lab_patient_options: Vec<SelectOption>,
    pub treatment_patient_options: Vec<SelectOption>,
    pub lab_form: LabOrderForm,
    pub lab_errors: FieldErrors,
    pub treatment_form: TreatmentForm,
    pub treatment_errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "patient_detail.html")]
pub struct PatientDetailTemplate {
    pub banner: Option<BannerView>,
    pub user_email: Option<String>,
    pub patient: PatientRow,
    pub primary_doctor: String,
    pub treatment_rows: String,
}

#[derive(Template)]
#[template(path = "nurse_dashboard.html")]
pub struct NurseDashboardTemplate {
    pub banner: Option<BannerView>,
    pub user_email: Option<String>,
    pub show_manual_id: bool,
    pub info: Option<NurseInfo>,
    pub info_message: Option<String>,
    pub pending_rows: String,
    pub completed_rows: String,
    pub order_options: Vec<LabOrderOption>,
    pub form: LabResultForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "confirm_cancel.html")]
pub struct ConfirmCancelTemplate {
    pub banner: Option<BannerView>,
    pub user_email: Option<String>,
    pub appointment_id: i64,
    pub when: String,
    pub doctor: String,
    pub reason: String,
}

// Table bodies. Pages embed them pre-rendered; the `/rows` endpoints serve
// them alone.

#[derive(Template)]
#[template(path = "rows/patient_appointments.html")]
pub struct PatientAppointmentRows {
    pub placeholder: Option<String>,
    pub rows: Vec<patient::AppointmentRow>,
}

impl PatientAppointmentRows {
    pub fn new(view: TableView<patient::AppointmentRow>) -> Self {
        let (placeholder, rows) = view.into_parts("appointments");
        Self { placeholder, rows }
    }
}

#[derive(Template)]
#[template(path = "rows/patient_lab_results.html")]
pub struct PatientLabRows {
    pub placeholder: Option<String>,
    pub rows: Vec<patient::LabResultRow>,
}

impl PatientLabRows {
    pub fn new(view: TableView<patient::LabResultRow>) -> Self {
        let (placeholder, rows) = view.into_parts("lab results");
        Self { placeholder, rows }
    }
}

#[derive(Template)]
#[template(path = "rows/patient_treatments.html")]
pub struct PatientTreatmentRows {
    pub placeholder: Option<String>,
    pub rows: Vec<patient::TreatmentRow>,
}

impl PatientTreatmentRows {
    pub fn new(view: TableView<patient::TreatmentRow>) -> Self {
        let (placeholder, rows) = view.into_parts("treatments");
        Self { placeholder, rows }
    }
}

#[derive(Template)]
#[template(path = "rows/doctor_patients.html")]
pub struct DoctorPatientRows {
    pub placeholder: Option<String>,
    pub rows: Vec<PatientRow>,
}

impl DoctorPatientRows {
    pub fn new(view: TableView<PatientRow>) -> Self {
        let (placeholder, rows) = view.into_parts("patients");
        Self { placeholder, rows }
    }
}

#[derive(Template)]
#[template(path = "rows/doctor_appointments.html")]
pub struct DoctorAppointmentRows {
    pub placeholder: Option<String>,
    pub rows: Vec<doctor::AppointmentRow>,
}

impl DoctorAppointmentRows {
    pub fn new(view: TableView<doctor::AppointmentRow>) -> Self {
        let (placeholder, rows) = view.into_parts("appointments");
        Self { placeholder, rows }
    }
}

#[derive(Template)]
#[template(path = "rows/detail_treatments.html")]
pub struct DetailTreatmentRows {
    pub placeholder: Option<String>,
    pub rows: Vec<doctor::TreatmentRow>,
}

impl DetailTreatmentRows {
    pub fn new(view: TableView<doctor::TreatmentRow>) -> Self {
        let (placeholder, rows) = view.into_parts("treatments");
        Self { placeholder, rows }
    }
}

#[derive(Template)]
#[template(path = "rows/pending_lab_results.html")]
pub struct PendingLabRows {
    pub placeholder: Option<String>,
    pub rows: Vec<nurse::PendingLabRow>,
}

impl PendingLabRows {
    pub fn new(view: TableView<nurse::PendingLabRow>) -> Self {
        let (placeholder, rows) = view.into_parts("pending lab results");
        Self { placeholder, rows }
    }
}

#[derive(Template)]
#[template(path = "rows/completed_lab_results.html")]
pub struct CompletedLabRows {
    pub placeholder: Option<String>,
    pub rows: Vec<nurse::CompletedLabRow>,
}

impl CompletedLabRows {
    pub fn new(view: TableView<nurse::CompletedLabRow>) -> Self {
        let (placeholder, rows) = view.into_parts("completed lab results");
        Self { placeholder, rows }
    }
}
