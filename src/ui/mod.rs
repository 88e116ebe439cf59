// Portal UI: askama-rendered pages, the navigation flow and dashboard actions

mod doctor;
mod error;
mod navigation;
mod nurse;
mod patient;
mod templates;

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::db::Role;
use crate::identity::{self, Identity};
use crate::session::{Banner, SessionContext};
use crate::AppState;

pub use error::{ErrorCode, PageError};
pub use templates::*;

// Helper to render templates and handle errors
fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Template error: {}", e)).into_response(),
    }
}

// Table bodies are embedded in pages, so a failure degrades to one row
fn render_fragment<T: Template>(template: T) -> String {
    match template.render() {
        Ok(html) => html,
        Err(e) => {
            tracing::error!(error = %e, "Failed to render table rows");
            r#"<tr class="placeholder"><td colspan="7">Unable to display rows</td></tr>"#.to_string()
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        // Navigation
        .route("/", get(navigation::home))
        .route("/select-role/:role", get(navigation::select_role))
        .route("/login", get(navigation::login_page).post(navigation::login_submit))
        .route("/logout", get(navigation::logout).post(navigation::logout))
        .route("/identity/manual", post(navigation::manual_identity))
        // Patient
        .route("/patient", get(patient::dashboard))
        .route("/patient/appointments", post(patient::book_appointment))
        .route("/patient/appointments/rows", get(patient::appointment_rows))
        .route(
            "/patient/appointments/:id/cancel",
            get(patient::confirm_cancel).post(patient::cancel_appointment),
        )
        .route("/patient/lab-results/rows", get(patient::lab_result_rows))
        .route("/patient/treatments/rows", get(patient::treatment_rows))
        // Doctor
        .route("/doctor", get(doctor::dashboard))
        .route("/doctor/patients/rows", get(doctor::patient_rows))
        .route("/doctor/patients/:id", get(doctor::patient_detail))
        .route("/doctor/appointments/rows", get(doctor::appointment_rows))
        .route("/doctor/appointments/:id/complete", post(doctor::complete_appointment))
        .route("/doctor/lab-orders", post(doctor::order_lab_test))
        .route("/doctor/treatments", post(doctor::add_treatment))
        // Nurse
        .route("/nurse", get(nurse::dashboard))
        .route("/nurse/lab-results", post(nurse::submit_lab_result))
        .route("/nurse/lab-results/pending/rows", get(nurse::pending_rows))
        .route("/nurse/lab-results/completed/rows", get(nurse::completed_rows))
        .route("/health", get(health_check))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Pending banner from an earlier request, consumed
fn page_banner(state: &AppState, session: &mut SessionContext) -> Option<BannerView> {
    let ttl = state.banner_ttl();
    session
        .take_banner(ttl)
        .and_then(|banner| BannerView::new(&banner, ttl))
}

/// Banner shown on the page being rendered right now
fn inline_banner(state: &AppState, banner: Banner) -> Option<BannerView> {
    BannerView::new(&banner, state.banner_ttl())
}

fn user_email(session: &SessionContext) -> Option<String> {
    session.email().map(str::to_string)
}

/// Logged-in users who wander onto another role's pages go back to their own
fn wrong_role(session: &SessionContext, role: Role) -> Option<Redirect> {
    match session.role() {
        Some(current) if current != role => Some(Redirect::to(current.dashboard_path())),
        _ => None,
    }
}

/// Resolve the id a dashboard works with; visitors without this role get
/// `Anonymous` and trigger no lookups
async fn dashboard_identity(state: &AppState, session: &mut SessionContext, role: Role) -> Identity {
    if session.role() != Some(role) {
        return Identity::Anonymous;
    }
    identity::resolve(state.store.as_ref(), session, role).await
}

fn show_manual_id(state: &AppState, identity: Identity) -> bool {
    state.config.identity.allow_manual_id && identity == Identity::Unresolved
}
