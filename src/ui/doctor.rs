//! Doctor dashboard: patients, assigned appointments, lab orders and
//! treatments.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;
use tracing::{error, info};

use super::{
    dashboard_identity, inline_banner, page_banner, render_fragment, render_template,
    show_manual_id, user_email, wrong_role, BannerView, DetailTreatmentRows,
    DoctorAppointmentRows, DoctorDashboardTemplate, DoctorPatientRows, PageError,
    PatientDetailTemplate, SelectOption,
};
use crate::db::Role;
use crate::forms::{FieldErrors, LabOrderForm, TreatmentForm};
use crate::identity::Identity;
use crate::session::{Banner, SessionContext};
use crate::views::{self, PanelView};
use crate::AppState;

const DASHBOARD: &str = "/doctor";

/// Form state carried into a re-render
#[derive(Default)]
struct Forms {
    lab: LabOrderForm,
    lab_errors: FieldErrors,
    treatment: TreatmentForm,
    treatment_errors: FieldErrors,
}

async fn page(
    state: &AppState,
    session: &SessionContext,
    identity: Identity,
    banner: Option<BannerView>,
    forms: Forms,
) -> DoctorDashboardTemplate {
    let store = state.store.as_ref();
    let doctor_id = identity.id();

    let (patients, options) = views::doctor::patients(store, doctor_id).await;
    let appointments = views::doctor::appointments(store, doctor_id).await;

    let lab_patient_options = options
        .iter()
        .map(|o| SelectOption::new(o.id, o.label.clone(), &forms.lab.patient_id))
        .collect();
    let treatment_patient_options = options
        .iter()
        .map(|o| SelectOption::new(o.id, o.label.clone(), &forms.treatment.patient_id))
        .collect();

    DoctorDashboardTemplate {
        banner,
        user_email: user_email(session),
        show_manual_id: show_manual_id(state, identity),
        patient_rows: render_fragment(DoctorPatientRows::new(patients)),
        appointment_rows: render_fragment(DoctorAppointmentRows::new(appointments)),
        lab_patient_options,
        treatment_patient_options,
        lab_form: forms.lab,
        lab_errors: forms.lab_errors,
        treatment_form: forms.treatment,
        treatment_errors: forms.treatment_errors,
    }
}

pub(super) async fn dashboard(State(state): State<Arc<AppState>>, mut session: SessionContext) -> Response {
    if let Some(redirect) = wrong_role(&session, Role::Doctor) {
        return (session, redirect).into_response();
    }
    let identity = dashboard_identity(&state, &mut session, Role::Doctor).await;
    let banner = page_banner(&state, &mut session);
    let page = page(&state, &session, identity, banner, Forms::default()).await;
    (session, render_template(page)).into_response()
}

pub(super) async fn order_lab_test(
    State(state): State<Arc<AppState>>,
    mut session: SessionContext,
    Form(form): Form<LabOrderForm>,
) -> Response {
    if let Some(redirect) = wrong_role(&session, Role::Doctor) {
        return (session, redirect).into_response();
    }
    let identity = dashboard_identity(&state, &mut session, Role::Doctor).await;
    let Some(doctor_id) = identity.id() else {
        session.flash(Banner::error("Please log in to order lab tests"));
        return (session, Redirect::to(DASHBOARD)).into_response();
    };

    let order = match form.validate(doctor_id) {
        Ok(order) => order,
        Err(errors) => {
            let banner = inline_banner(&state, Banner::error(errors.message()));
            let forms = Forms {
                lab: form,
                lab_errors: errors,
                ..Default::default()
            };
            let page = page(&state, &session, identity, banner, forms).await;
            return (StatusCode::BAD_REQUEST, session, render_template(page)).into_response();
        }
    };

    match state.store.insert_lab_order(&order).await {
        Ok(lab_res_id) => {
            info!(lab_res_id, doctor_id, patient_id = order.patient_id, "Lab test ordered");
            session.flash(Banner::success("Lab test ordered successfully!"));
            (session, Redirect::to(DASHBOARD)).into_response()
        }
        Err(e) => {
            error!(doctor_id, error = %e, "Failed to order lab test");
            let banner = inline_banner(&state, Banner::error("Error ordering lab test. Please try again."));
            let forms = Forms {
                lab: form,
                ..Default::default()
            };
            let page = page(&state, &session, identity, banner, forms).await;
            (StatusCode::INTERNAL_SERVER_ERROR, session, render_template(page)).into_response()
        }
    }
}

pub(super) async fn add_treatment(
    State(state): State<Arc<AppState>>,
    mut session: SessionContext,
    Form(form): Form<TreatmentForm>,
) -> Response {
    if let Some(redirect) = wrong_role(&session, Role::Doctor) {
        return (session, redirect).into_response();
    }
    let identity = dashboard_identity(&state, &mut session, Role::Doctor).await;
    let Some(doctor_id) = identity.id() else {
        session.flash(Banner::error("Please log in to add treatments"));
        return (session, Redirect::to(DASHBOARD)).into_response();
    };

    let treatment = match form.validate(doctor_id) {
        Ok(treatment) => treatment,
        Err(errors) => {
            let banner = inline_banner(&state, Banner::error(errors.message()));
            let forms = Forms {
                treatment: form,
                treatment_errors: errors,
                ..Default::default()
            };
            let page = page(&state, &session, identity, banner, forms).await;
            return (StatusCode::BAD_REQUEST, session, render_template(page)).into_response();
        }
    };

    match state.store.insert_treatment(&treatment).await {
        Ok(treatment_id) => {
            info!(treatment_id, doctor_id, patient_id = treatment.patient_id, "Treatment added");
            session.flash(Banner::success("Treatment added successfully!"));
            (session, Redirect::to(DASHBOARD)).into_response()
        }
        Err(e) => {
            error!(doctor_id, error = %e, "Failed to add treatment");
            let banner = inline_banner(&state, Banner::error("Error adding treatment. Please try again."));
            let forms = Forms {
                treatment: form,
                ..Default::default()
            };
            let page = page(&state, &session, identity, banner, forms).await;
            (StatusCode::INTERNAL_SERVER_ERROR, session, render_template(page)).into_response()
        }
    }
}

pub(super) async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    mut session: SessionContext,
    Path(appointment_id): Path<i64>,
) -> Response {
    if let Some(redirect) = wrong_role(&session, Role::Doctor) {
        return (session, redirect).into_response();
    }
    let identity = dashboard_identity(&state, &mut session, Role::Doctor).await;
    let Some(doctor_id) = identity.id() else {
        session.flash(Banner::error("Please log in to manage appointments"));
        return (session, Redirect::to(DASHBOARD)).into_response();
    };

    let banner = match state.store.complete_appointment(appointment_id, doctor_id).await {
        Ok(true) => {
            info!(appointment_id, doctor_id, "Appointment completed");
            Banner::success("Appointment marked as completed!")
        }
        Ok(false) => Banner::error("Appointment not found."),
        Err(e) => {
            error!(appointment_id, error = %e, "Failed to complete appointment");
            Banner::error("Error updating appointment. Please try again.")
        }
    };
    session.flash(banner);
    (session, Redirect::to(DASHBOARD)).into_response()
}

pub(super) async fn patient_detail(
    State(state): State<Arc<AppState>>,
    mut session: SessionContext,
    Path(patient_id): Path<i64>,
) -> Result<Response, PageError> {
    if let Some(redirect) = wrong_role(&session, Role::Doctor) {
        return Ok((session, redirect).into_response());
    }
    let identity = dashboard_identity(&state, &mut session, Role::Doctor).await;

    let detail = match views::doctor::patient_detail(state.store.as_ref(), identity.id(), patient_id).await {
        PanelView::Ready(detail) => detail,
        PanelView::LoginRequired => {
            session.flash(Banner::error("Please log in to view patient details"));
            return Ok((session, Redirect::to(DASHBOARD)).into_response());
        }
        PanelView::Missing => return Err(PageError::not_found("Patient not found")),
        PanelView::Unavailable => {
            return Err(PageError::internal("Unable to load patient. Please try again."))
        }
    };

    let page = PatientDetailTemplate {
        banner: page_banner(&state, &mut session),
        user_email: user_email(&session),
        patient: detail.patient,
        primary_doctor: detail.primary_doctor,
        treatment_rows: render_fragment(DetailTreatmentRows::new(detail.treatments)),
    };
    Ok((session, render_template(page)).into_response())
}

pub(super) async fn patient_rows(State(state): State<Arc<AppState>>, mut session: SessionContext) -> Response {
    let doctor_id = dashboard_identity(&state, &mut session, Role::Doctor).await.id();
    let (view, _) = views::doctor::patients(state.store.as_ref(), doctor_id).await;
    (session, Html(render_fragment(DoctorPatientRows::new(view)))).into_response()
}

pub(super) async fn appointment_rows(State(state): State<Arc<AppState>>, mut session: SessionContext) -> Response {
    let doctor_id = dashboard_identity(&state, &mut session, Role::Doctor).await.id();
    let view = views::doctor::appointments(state.store.as_ref(), doctor_id).await;
    (session, Html(render_fragment(DoctorAppointmentRows::new(view)))).into_response()
}
