//! Home page, role selection, login and logout.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::{inline_banner, page_banner, render_template, user_email, HomeTemplate, LoginTemplate, PageError};
use crate::auth::{authenticate, AuthError};
use crate::db::Role;
use crate::identity::apply_manual_id;
use crate::session::{Banner, SessionContext, SessionKey};
use crate::AppState;

/// Ids cached for the previous account; dropped when someone else logs in
const IDENTITY_KEYS: [SessionKey; 4] = [
    SessionKey::DoctorId,
    SessionKey::NurseId,
    SessionKey::PatientId,
    SessionKey::PrimaryDoctorId,
];

pub(super) async fn home(State(state): State<Arc<AppState>>, mut session: SessionContext) -> Response {
    let banner = page_banner(&state, &mut session);
    let dashboard = match (session.role(), session.email()) {
        (Some(role), Some(_)) => Some(role.dashboard_path()),
        _ => None,
    };
    let page = HomeTemplate {
        banner,
        user_email: user_email(&session),
        roles: Role::ALL.to_vec(),
        dashboard,
    };
    (session, render_template(page)).into_response()
}

pub(super) async fn select_role(
    mut session: SessionContext,
    Path(role): Path<String>,
) -> Result<Response, PageError> {
    let role: Role = role
        .parse()
        .map_err(|_| PageError::bad_request("Invalid role selected"))?;
    session.set(SessionKey::SelectedRole, role.as_str());
    let target = format!("/login?role={}", role.as_str());
    Ok((session, Redirect::to(&target)).into_response())
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginQuery {
    role: Option<String>,
}

pub(super) async fn login_page(
    State(state): State<Arc<AppState>>,
    mut session: SessionContext,
    Query(query): Query<LoginQuery>,
) -> Response {
    let requested = query
        .role
        .or_else(|| session.get(SessionKey::SelectedRole).map(str::to_string));
    let Some(role) = requested.and_then(|r| r.parse::<Role>().ok()) else {
        session.flash(Banner::error("Please select a role first"));
        return (session, Redirect::to("/")).into_response();
    };
    if session.get(SessionKey::SelectedRole) != Some(role.as_str()) {
        session.set(SessionKey::SelectedRole, role.as_str());
    }

    let page = LoginTemplate {
        banner: page_banner(&state, &mut session),
        user_email: user_email(&session),
        role_value: role.as_str(),
        role_title: role.title(),
        email: String::new(),
    };
    (session, render_template(page)).into_response()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct LoginForm {
    email: String,
    password: String,
    role: String,
}

pub(super) async fn login_submit(
    State(state): State<Arc<AppState>>,
    mut session: SessionContext,
    Form(form): Form<LoginForm>,
) -> Response {
    let role = form
        .role
        .parse::<Role>()
        .ok()
        .or_else(|| session.get(SessionKey::SelectedRole).and_then(|r| r.parse().ok()));
    let Some(role) = role else {
        session.flash(Banner::error("Please select a role first"));
        return (session, Redirect::to("/")).into_response();
    };

    match authenticate(state.store.as_ref(), &form.email, &form.password, role).await {
        Ok(user) => {
            let same_account = session.email() == Some(user.email.as_str());
            if !same_account {
                for key in IDENTITY_KEYS {
                    session.remove(key);
                }
            }
            session.set(SessionKey::UserRole, role.as_str());
            session.set(SessionKey::UserEmail, user.email.as_str());
            session.remove(SessionKey::SelectedRole);
            info!(email = %user.email, role = %role, "User logged in");
            (session, Redirect::to(role.dashboard_path())).into_response()
        }
        Err(AuthError::Store(e)) => {
            error!(error = %e, "Login lookup failed");
            let page = login_again(&state, &session, role, form.email, "Login failed. Please try again.");
            (StatusCode::INTERNAL_SERVER_ERROR, session, render_template(page)).into_response()
        }
        Err(e) => {
            warn!(email = %form.email.trim(), role = %role, "Rejected login");
            let message = e.to_string();
            let page = login_again(&state, &session, role, form.email, &message);
            (StatusCode::UNAUTHORIZED, session, render_template(page)).into_response()
        }
    }
}

fn login_again(
    state: &AppState,
    session: &SessionContext,
    role: Role,
    email: String,
    message: &str,
) -> LoginTemplate {
    LoginTemplate {
        banner: inline_banner(state, Banner::error(message)),
        user_email: user_email(session),
        role_value: role.as_str(),
        role_title: role.title(),
        email,
    }
}

pub(super) async fn logout(mut session: SessionContext) -> Response {
    if let Some(email) = session.email() {
        info!(email = %email, "User logged out");
    }
    session.clear();
    (session, Redirect::to("/")).into_response()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ManualIdForm {
    #[serde(rename = "ID")]
    id: String,
}

pub(super) async fn manual_identity(
    State(state): State<Arc<AppState>>,
    mut session: SessionContext,
    Form(form): Form<ManualIdForm>,
) -> Response {
    if !state.config.identity.allow_manual_id {
        return PageError::not_found("Page not found").into_response();
    }
    let Some(role) = session.role() else {
        return (session, Redirect::to("/")).into_response();
    };

    match apply_manual_id(&mut session, role, &form.id) {
        Ok(id) => session.flash(Banner::success(format!("{} ID set to {}", role.title(), id))),
        Err(message) => session.flash(Banner::error(message)),
    }
    (session, Redirect::to(role.dashboard_path())).into_response()
}
