//! Tab-scoped session state.
//!
//! A session is a small key/value map created the first time a visitor picks a
//! role or logs in, addressed by a random token held in a browser-session
//! cookie. Entries are keyed by the token's hash and dropped once idle for
//! longer than the configured timeout.

mod context;

pub use context::{SessionContext, SESSION_COOKIE};

use dashmap::DashMap;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::auth::{generate_token, hash_token};
use crate::db::Role;

/// Keys a session can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    UserRole,
    UserEmail,
    DoctorId,
    NurseId,
    PatientId,
    PrimaryDoctorId,
    SelectedRole,
}

impl SessionKey {
    pub const ALL: [SessionKey; 7] = [
        SessionKey::UserRole,
        SessionKey::UserEmail,
        SessionKey::DoctorId,
        SessionKey::NurseId,
        SessionKey::PatientId,
        SessionKey::PrimaryDoctorId,
        SessionKey::SelectedRole,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserRole => "userRole",
            Self::UserEmail => "userEmail",
            Self::DoctorId => "doctorID",
            Self::NurseId => "nurseID",
            Self::PatientId => "patientID",
            Self::PrimaryDoctorId => "primaryDoctorID",
            Self::SelectedRole => "selectedRole",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

impl BannerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A transient success/error message shown once, then removed
#[derive(Debug, Clone)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    created_at: Instant,
}

impl Banner {
    pub fn new(kind: BannerKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            created_at: Instant::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(BannerKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(BannerKind::Error, message)
    }

    /// Milliseconds left before the banner removes itself, if any
    pub fn remaining(&self, ttl: Duration) -> Option<Duration> {
        ttl.checked_sub(self.created_at.elapsed())
            .filter(|left| !left.is_zero())
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    values: HashMap<SessionKey, String>,
    banner: Option<Banner>,
    last_seen: Instant,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            banner: None,
            last_seen: Instant::now(),
        }
    }
}

impl SessionState {
    pub fn get(&self, key: SessionKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Numeric ids are stored as strings; anything unparsable reads as unset
    pub fn get_id(&self, key: SessionKey) -> Option<i64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    pub fn set(&mut self, key: SessionKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn remove(&mut self, key: SessionKey) {
        self.values.remove(&key);
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.banner = None;
    }

    pub fn role(&self) -> Option<Role> {
        self.get(SessionKey::UserRole).and_then(|r| r.parse().ok())
    }

    pub fn email(&self) -> Option<&str> {
        self.get(SessionKey::UserEmail).filter(|e| !e.is_empty())
    }

    pub fn set_banner(&mut self, banner: Banner) {
        self.banner = Some(banner);
    }

    pub fn take_banner(&mut self) -> Option<Banner> {
        self.banner.take()
    }

    fn is_idle(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }
}

/// Process-wide session table
pub struct SessionStore {
    entries: DashMap<String, SessionState>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            idle_timeout,
        }
    }

    /// Start an empty session and return its raw token
    pub fn create(&self) -> String {
        let token = generate_token();
        self.entries.insert(hash_token(&token), SessionState::default());
        token
    }

    /// Snapshot of the session behind `token`, refreshing its idle timer
    pub fn load(&self, token: &str) -> Option<SessionState> {
        let key = hash_token(token);
        let mut entry = self.entries.get_mut(&key)?;
        if entry.is_idle(self.idle_timeout) {
            drop(entry);
            self.entries.remove(&key);
            return None;
        }
        entry.last_seen = Instant::now();
        Some(entry.value().clone())
    }

    /// Apply `f` to a live session; `None` when the token is unknown
    pub fn update<R>(&self, token: &str, f: impl FnOnce(&mut SessionState) -> R) -> Option<R> {
        let mut entry = self.entries.get_mut(&hash_token(token))?;
        entry.last_seen = Instant::now();
        Some(f(entry.value_mut()))
    }

    pub fn destroy(&self, token: &str) {
        self.entries.remove(&hash_token(token));
    }

    /// Drop every idle session, returning how many were removed
    pub fn purge_idle(&self) -> usize {
        let before = self.entries.len();
        let timeout = self.idle_timeout;
        self.entries.retain(|_, state| !state.is_idle(timeout));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        let names: Vec<_> = SessionKey::ALL.iter().map(SessionKey::as_str).collect();
        assert_eq!(
            names,
            vec![
                "userRole",
                "userEmail",
                "doctorID",
                "nurseID",
                "patientID",
                "primaryDoctorID",
                "selectedRole"
            ]
        );
    }

    #[test]
    fn test_state_ids_parse_or_read_unset() {
        let mut state = SessionState::default();
        state.set(SessionKey::DoctorId, "12");
        state.set(SessionKey::NurseId, "twelve");
        assert_eq!(state.get_id(SessionKey::DoctorId), Some(12));
        assert_eq!(state.get_id(SessionKey::NurseId), None);
        assert_eq!(state.get_id(SessionKey::PatientId), None);
    }

    #[test]
    fn test_store_roundtrip_and_destroy() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create();

        store.update(&token, |s| s.set(SessionKey::UserRole, "nurse"));
        let state = store.load(&token).unwrap();
        assert_eq!(state.role(), Some(Role::Nurse));

        store.destroy(&token);
        assert!(store.load(&token).is_none());
        assert!(store.update(&token, |_| ()).is_none());
    }

    #[test]
    fn test_idle_sessions_are_dropped() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.create();
        std::thread::sleep(Duration::from_millis(5));
        assert!(store.load(&token).is_none());
        assert!(store.is_empty());

        store.create();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(store.purge_idle(), 1);
    }

    #[test]
    fn test_banner_expires() {
        let banner = Banner::success("Saved");
        assert!(banner.remaining(Duration::from_secs(5)).is_some());
        assert!(banner.remaining(Duration::ZERO).is_none());
    }
}
