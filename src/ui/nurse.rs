//! Nurse dashboard: pending and completed lab tests, result entry.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::{
    dashboard_identity, inline_banner, page_banner, render_fragment, render_template,
    show_manual_id, user_email, wrong_role, BannerView, CompletedLabRows,
    NurseDashboardTemplate, PendingLabRows,
};
use crate::db::Role;
use crate::forms::{FieldErrors, LabResultForm};
use crate::identity::Identity;
use crate::session::{Banner, SessionContext};
use crate::views::{self, PanelView};
use crate::AppState;

const DASHBOARD: &str = "/nurse";

async fn page(
    state: &AppState,
    session: &SessionContext,
    identity: Identity,
    banner: Option<BannerView>,
    mut form: LabResultForm,
    errors: FieldErrors,
) -> NurseDashboardTemplate {
    let store = state.store.as_ref();
    let nurse_id = identity.id();

    let (info, info_message) = match views::nurse::info(store, nurse_id).await {
        PanelView::Ready(info) => (Some(info), None),
        PanelView::LoginRequired => (None, Some("Please log in to view your information".to_string())),
        PanelView::Missing => (None, Some("N/A".to_string())),
        PanelView::Unavailable => (
            None,
            Some("Unable to load your information. Please try again.".to_string()),
        ),
    };

    let (pending, order_options) =
        views::nurse::pending_lab_results(store, nurse_id, form.selected_order()).await;
    let completed = views::nurse::completed_lab_results(store, nurse_id).await;

    // Display-only fields mirror the chosen order
    if let Some(order) = order_options.iter().find(|o| o.selected) {
        form.test_type = order.test_type.clone();
        form.patient_id = order.patient_id.to_string();
        form.doctor_id = order.doctor_id.to_string();
    }

    NurseDashboardTemplate {
        banner,
        user_email: user_email(session),
        show_manual_id: show_manual_id(state, identity),
        info,
        info_message,
        pending_rows: render_fragment(PendingLabRows::new(pending)),
        completed_rows: render_fragment(CompletedLabRows::new(completed)),
        order_options,
        form,
        errors,
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct DashboardQuery {
    /// Lab order picked with "Conduct Test"
    order: Option<String>,
}

pub(super) async fn dashboard(
    State(state): State<Arc<AppState>>,
    mut session: SessionContext,
    Query(query): Query<DashboardQuery>,
) -> Response {
    if let Some(redirect) = wrong_role(&session, Role::Nurse) {
        return (session, redirect).into_response();
    }
    let identity = dashboard_identity(&state, &mut session, Role::Nurse).await;
    let banner = page_banner(&state, &mut session);
    let form = LabResultForm {
        lab_res_id: query.order.unwrap_or_default(),
        ..Default::default()
    };
    let page = page(&state, &session, identity, banner, form, FieldErrors::new()).await;
    (session, render_template(page)).into_response()
}

pub(super) async fn submit_lab_result(
    State(state): State<Arc<AppState>>,
    mut session: SessionContext,
    Form(form): Form<LabResultForm>,
) -> Response {
    if let Some(redirect) = wrong_role(&session, Role::Nurse) {
        return (session, redirect).into_response();
    }
    let identity = dashboard_identity(&state, &mut session, Role::Nurse).await;
    let Some(nurse_id) = identity.id() else {
        session.flash(Banner::error("Please log in to submit lab results"));
        return (session, Redirect::to(DASHBOARD)).into_response();
    };

    let entry = match form.validate(nurse_id) {
        Ok(entry) => entry,
        Err(errors) => {
            let banner = inline_banner(&state, Banner::error(errors.message()));
            let page = page(&state, &session, identity, banner, form, errors).await;
            return (StatusCode::BAD_REQUEST, session, render_template(page)).into_response();
        }
    };

    match state.store.record_lab_result(&entry).await {
        Ok(true) => {
            info!(lab_res_id = entry.lab_res_id, nurse_id, "Lab result recorded");
            session.flash(Banner::success("Lab results submitted successfully!"));
            (session, Redirect::to(DASHBOARD)).into_response()
        }
        Ok(false) => {
            warn!(lab_res_id = entry.lab_res_id, nurse_id, "Lab order is not pending");
            session.flash(Banner::error("This lab test is no longer pending."));
            (session, Redirect::to(DASHBOARD)).into_response()
        }
        Err(e) => {
            error!(lab_res_id = entry.lab_res_id, error = %e, "Failed to record lab result");
            let banner = inline_banner(
                &state,
                Banner::error("Error submitting lab results. Please try again."),
            );
            let page = page(&state, &session, identity, banner, form, FieldErrors::new()).await;
            (StatusCode::INTERNAL_SERVER_ERROR, session, render_template(page)).into_response()
        }
    }
}

pub(super) async fn pending_rows(State(state): State<Arc<AppState>>, mut session: SessionContext) -> Response {
    let nurse_id = dashboard_identity(&state, &mut session, Role::Nurse).await.id();
    let (view, _) = views::nurse::pending_lab_results(state.store.as_ref(), nurse_id, None).await;
    (session, Html(render_fragment(PendingLabRows::new(view)))).into_response()
}

pub(super) async fn completed_rows(State(state): State<Arc<AppState>>, mut session: SessionContext) -> Response {
    let nurse_id = dashboard_identity(&state, &mut session, Role::Nurse).await.id();
    let view = views::nurse::completed_lab_results(state.store.as_ref(), nurse_id).await;
    (session, Html(render_fragment(CompletedLabRows::new(view)))).into_response()
}
