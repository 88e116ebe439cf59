use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponseParts, ResponseParts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use super::{Banner, SessionKey, SessionState, SessionStore};
use crate::db::Role;
use crate::AppState;

/// Session token cookie name
pub const SESSION_COOKIE: &str = "mediconnect_session";

/// The session as seen by one request.
///
/// Built once per request by the extractor below and handed to the handler.
/// Reads come from a snapshot; writes go to the snapshot and the shared store.
/// Returning the context as part of the response sets or clears the cookie.
pub struct SessionContext {
    store: Arc<SessionStore>,
    token: Option<String>,
    state: SessionState,
    jar: CookieJar,
}

impl SessionContext {
    pub fn load(store: Arc<SessionStore>, jar: CookieJar) -> Self {
        let existing = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .and_then(|token| store.load(&token).map(|state| (token, state)));

        let (token, state) = match existing {
            Some((token, state)) => (Some(token), state),
            None => (None, SessionState::default()),
        };

        Self {
            store,
            token,
            state,
            jar,
        }
    }

    pub fn get(&self, key: SessionKey) -> Option<&str> {
        self.state.get(key)
    }

    pub fn get_id(&self, key: SessionKey) -> Option<i64> {
        self.state.get_id(key)
    }

    pub fn role(&self) -> Option<Role> {
        self.state.role()
    }

    pub fn email(&self) -> Option<&str> {
        self.state.email()
    }

    pub fn set(&mut self, key: SessionKey, value: impl Into<String>) {
        let value = value.into();
        self.write(|s| s.set(key, value.clone()));
    }

    pub fn remove(&mut self, key: SessionKey) {
        if self.state.get(key).is_some() {
            self.write(|s| s.remove(key));
        }
    }

    /// Forget everything and expire the cookie
    pub fn clear(&mut self) {
        if let Some(token) = self.token.take() {
            self.store.destroy(&token);
        }
        self.state.clear();
        let jar = std::mem::take(&mut self.jar);
        self.jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    }

    /// Queue a banner for the next rendered page
    pub fn flash(&mut self, banner: Banner) {
        self.write(|s| s.set_banner(banner.clone()));
    }

    /// Consume the pending banner, unless it has already timed out
    pub fn take_banner(&mut self, ttl: Duration) -> Option<Banner> {
        self.state.banner.as_ref()?;
        let banner = self.state.take_banner();
        if let Some(token) = &self.token {
            self.store.update(token, |s| s.take_banner());
        }
        banner.filter(|b| b.remaining(ttl).is_some())
    }

    fn write(&mut self, f: impl Fn(&mut SessionState)) {
        f(&mut self.state);
        let token = self.ensure_token();
        if self.store.update(&token, &f).is_none() {
            // Session vanished between load and write; start over with our snapshot
            let fresh = self.store.create();
            self.store.update(&fresh, |s| *s = self.state.clone());
            self.issue_cookie(fresh);
        }
    }

    fn ensure_token(&mut self) -> String {
        match &self.token {
            Some(token) => token.clone(),
            None => {
                let token = self.store.create();
                self.issue_cookie(token.clone());
                token
            }
        }
    }

    fn issue_cookie(&mut self, token: String) {
        let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        let jar = std::mem::take(&mut self.jar);
        self.jar = jar.add(cookie);
        self.token = Some(token);
    }
}

impl IntoResponseParts for SessionContext {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for SessionContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(SessionContext::load(state.sessions.clone(), jar))
    }
}
