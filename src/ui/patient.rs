//! Patient dashboard: primary doctor, appointments, lab results, treatments
//! and booking.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use super::{
    dashboard_identity, inline_banner, page_banner, render_fragment, render_template,
    show_manual_id, user_email, wrong_role, BannerView, ConfirmCancelTemplate,
    PageError, PatientAppointmentRows, PatientDashboardTemplate, PatientLabRows,
    PatientTreatmentRows, SelectOption,
};
use crate::db::Role;
use crate::forms::{AppointmentForm, FieldErrors};
use crate::identity::Identity;
use crate::join::{resolve_names, EntityKind};
use crate::session::{Banner, SessionContext, SessionKey};
use crate::views::{self, format_datetime, PanelView};
use crate::AppState;

const DASHBOARD: &str = "/patient";

async fn page(
    state: &AppState,
    session: &SessionContext,
    identity: Identity,
    banner: Option<BannerView>,
    form: AppointmentForm,
    errors: FieldErrors,
) -> PatientDashboardTemplate {
    let store = state.store.as_ref();
    let patient_id = identity.id();

    let cached_doctor = session.get_id(SessionKey::PrimaryDoctorId);
    let (doctor_panel, doctor_panel_message) =
        match views::patient::primary_doctor(store, patient_id, cached_doctor).await {
            PanelView::Ready(panel) => (Some(panel), None),
            PanelView::LoginRequired => (None, Some("Please log in to view your primary doctor".to_string())),
            PanelView::Missing => (None, Some("Not assigned".to_string())),
            PanelView::Unavailable => (
                None,
                Some("Unable to load primary doctor. Please try again.".to_string()),
            ),
        };

    let appointments = views::patient::appointments(store, patient_id).await;
    let lab_results = views::patient::lab_results(store, patient_id).await;
    let treatments = views::patient::treatments(store, patient_id).await;
    let doctor_options = views::patient::doctor_options(store, patient_id)
        .await
        .into_iter()
        .map(|option| SelectOption::new(option.id, option.label, &form.doctor_id))
        .collect();

    PatientDashboardTemplate {
        banner,
        user_email: user_email(session),
        show_manual_id: show_manual_id(state, identity),
        doctor_panel,
        doctor_panel_message,
        appointment_rows: render_fragment(PatientAppointmentRows::new(appointments)),
        lab_rows: render_fragment(PatientLabRows::new(lab_results)),
        treatment_rows: render_fragment(PatientTreatmentRows::new(treatments)),
        doctor_options,
        form,
        errors,
    }
}

pub(super) async fn dashboard(State(state): State<Arc<AppState>>, mut session: SessionContext) -> Response {
    if let Some(redirect) = wrong_role(&session, Role::Patient) {
        return (session, redirect).into_response();
    }
    let identity = dashboard_identity(&state, &mut session, Role::Patient).await;
    let banner = page_banner(&state, &mut session);
    let page = page(
        &state,
        &session,
        identity,
        banner,
        AppointmentForm::default(),
        FieldErrors::new(),
    )
    .await;
    (session, render_template(page)).into_response()
}

pub(super) async fn book_appointment(
    State(state): State<Arc<AppState>>,
    mut session: SessionContext,
    Form(form): Form<AppointmentForm>,
) -> Response {
    if let Some(redirect) = wrong_role(&session, Role::Patient) {
        return (session, redirect).into_response();
    }
    let identity = dashboard_identity(&state, &mut session, Role::Patient).await;
    let Some(patient_id) = identity.id() else {
        session.flash(Banner::error("Please log in to book an appointment"));
        return (session, Redirect::to(DASHBOARD)).into_response();
    };

    let appointment = match form.validate(patient_id) {
        Ok(appointment) => appointment,
        Err(errors) => {
            let banner = inline_banner(&state, Banner::error(errors.message()));
            let page = page(&state, &session, identity, banner, form, errors).await;
            return (StatusCode::BAD_REQUEST, session, render_template(page)).into_response();
        }
    };

    match state.store.insert_appointment(&appointment).await {
        Ok(appointment_id) => {
            info!(appointment_id, patient_id, doctor_id = appointment.doctor_id, "Appointment booked");
            session.flash(Banner::success("Appointment booked successfully!"));
            (session, Redirect::to(DASHBOARD)).into_response()
        }
        Err(e) => {
            error!(patient_id, error = %e, "Failed to book appointment");
            let banner = inline_banner(
                &state,
                Banner::error("Error booking appointment. Please try again."),
            );
            let page = page(&state, &session, identity, banner, form, FieldErrors::new()).await;
            (StatusCode::INTERNAL_SERVER_ERROR, session, render_template(page)).into_response()
        }
    }
}

pub(super) async fn confirm_cancel(
    State(state): State<Arc<AppState>>,
    mut session: SessionContext,
    Path(appointment_id): Path<i64>,
) -> Result<Response, PageError> {
    if let Some(redirect) = wrong_role(&session, Role::Patient) {
        return Ok((session, redirect).into_response());
    }
    let identity = dashboard_identity(&state, &mut session, Role::Patient).await;
    let Some(patient_id) = identity.id() else {
        session.flash(Banner::error("Please log in to manage appointments"));
        return Ok((session, Redirect::to(DASHBOARD)).into_response());
    };

    let appointment = state
        .store
        .get_appointment(appointment_id)
        .await?
        .filter(|a| a.patient_id == patient_id)
        .ok_or_else(|| PageError::not_found("Appointment not found"))?;
    if appointment.is_completed {
        return Err(PageError::bad_request("Completed appointments cannot be cancelled"));
    }

    let doctors = resolve_names(state.store.as_ref(), EntityKind::Doctor, [appointment.doctor_id]).await;
    let page = ConfirmCancelTemplate {
        banner: None,
        user_email: user_email(&session),
        appointment_id,
        when: format_datetime(&appointment.appt_date_time),
        doctor: doctors.label(appointment.doctor_id),
        reason: appointment.appt_reason,
    };
    Ok((session, render_template(page)).into_response())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct CancelForm {
    confirm: String,
}

pub(super) async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    mut session: SessionContext,
    Path(appointment_id): Path<i64>,
    Form(form): Form<CancelForm>,
) -> Response {
    if let Some(redirect) = wrong_role(&session, Role::Patient) {
        return (session, redirect).into_response();
    }
    if form.confirm != "yes" {
        return (session, Redirect::to(DASHBOARD)).into_response();
    }
    let identity = dashboard_identity(&state, &mut session, Role::Patient).await;
    let Some(patient_id) = identity.id() else {
        session.flash(Banner::error("Please log in to manage appointments"));
        return (session, Redirect::to(DASHBOARD)).into_response();
    };

    let banner = match state.store.delete_appointment(appointment_id, patient_id).await {
        Ok(true) => {
            info!(appointment_id, patient_id, "Appointment cancelled");
            Banner::success("Appointment cancelled.")
        }
        Ok(false) => Banner::error("Appointment not found."),
        Err(e) => {
            error!(appointment_id, error = %e, "Failed to cancel appointment");
            Banner::error("Error cancelling appointment. Please try again.")
        }
    };
    session.flash(banner);
    (session, Redirect::to(DASHBOARD)).into_response()
}

pub(super) async fn appointment_rows(State(state): State<Arc<AppState>>, mut session: SessionContext) -> Response {
    let patient_id = dashboard_identity(&state, &mut session, Role::Patient).await.id();
    let view = views::patient::appointments(state.store.as_ref(), patient_id).await;
    (session, Html(render_fragment(PatientAppointmentRows::new(view)))).into_response()
}

pub(super) async fn lab_result_rows(State(state): State<Arc<AppState>>, mut session: SessionContext) -> Response {
    let patient_id = dashboard_identity(&state, &mut session, Role::Patient).await.id();
    let view = views::patient::lab_results(state.store.as_ref(), patient_id).await;
    (session, Html(render_fragment(PatientLabRows::new(view)))).into_response()
}

pub(super) async fn treatment_rows(State(state): State<Arc<AppState>>, mut session: SessionContext) -> Response {
    let patient_id = dashboard_identity(&state, &mut session, Role::Patient).await.id();
    let view = views::patient::treatments(state.store.as_ref(), patient_id).await;
    (session, Html(render_fragment(PatientTreatmentRows::new(view)))).into_response()
}
