//! Resolves the logged-in email to the numeric id used by each dashboard.
//!
//! One attempt per page load, skipped entirely once the id is in the session.

use tracing::{debug, warn};

use crate::db::Role;
use crate::session::{SessionContext, SessionKey};
use crate::store::ClinicStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// Id available, either cached or just looked up
    Known(i64),
    /// Nobody is logged in
    Anonymous,
    /// Logged in, but the email matched no row (or the lookup failed)
    Unresolved,
}

impl Identity {
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Known(id) => Some(*id),
            _ => None,
        }
    }
}

pub async fn resolve(store: &dyn ClinicStore, session: &mut SessionContext, role: Role) -> Identity {
    if let Some(id) = session.get_id(role.id_key()) {
        return Identity::Known(id);
    }

    let email = match session.email() {
        Some(email) => email.to_string(),
        None => return Identity::Anonymous,
    };

    let found = match role {
        Role::Patient => store.find_patient_by_email(&email).await.map(|p| {
            p.map(|p| {
                if let Some(doc_id) = p.primary_doc_id {
                    session.set(SessionKey::PrimaryDoctorId, doc_id.to_string());
                }
                p.patient_id
            })
        }),
        Role::Doctor => store
            .find_doctor_by_email(&email)
            .await
            .map(|d| d.map(|d| d.doctor_id)),
        Role::Nurse => store
            .find_nurse_by_email(&email)
            .await
            .map(|n| n.map(|n| n.nurse_id)),
    };

    match found {
        Ok(Some(id)) => {
            debug!(role = %role, id, "Resolved identity from email");
            session.set(role.id_key(), id.to_string());
            Identity::Known(id)
        }
        Ok(None) => {
            warn!(role = %role, email = %email, "No record matches the session email");
            Identity::Unresolved
        }
        Err(e) => {
            warn!(role = %role, email = %email, error = %e, "Identity lookup failed");
            Identity::Unresolved
        }
    }
}

/// Store an operator-entered id for `role`
pub fn apply_manual_id(session: &mut SessionContext, role: Role, raw: &str) -> Result<i64, String> {
    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| "ID must be a whole number".to_string())?;
    if id <= 0 {
        return Err("ID must be positive".to_string());
    }
    session.set(role.id_key(), id.to_string());
    warn!(role = %role, id, "Identity set manually");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use crate::store::testing::{fixture_store, ids, CountingStore, FailingStore};
    use axum_extra::extract::CookieJar;
    use std::sync::Arc;
    use std::time::Duration;

    fn session_for(email: Option<&str>, role: Role) -> SessionContext {
        let store = Arc::new(SessionStore::new(Duration::from_secs(600)));
        let mut session = SessionContext::load(store, CookieJar::new());
        session.set(SessionKey::UserRole, role.as_str());
        if let Some(email) = email {
            session.set(SessionKey::UserEmail, email);
        }
        session
    }

    #[tokio::test]
    async fn test_resolves_and_caches_doctor() {
        let store = CountingStore::new(fixture_store().await);
        let mut session = session_for(Some("john.smith@mediconnect.com"), Role::Doctor);

        let first = resolve(&store, &mut session, Role::Doctor).await;
        assert_eq!(first, Identity::Known(ids::DR_SMITH));
        assert_eq!(session.get_id(SessionKey::DoctorId), Some(ids::DR_SMITH));
        assert_eq!(store.calls(), 1);

        let second = resolve(&store, &mut session, Role::Doctor).await;
        assert_eq!(second, Identity::Known(ids::DR_SMITH));
        assert_eq!(store.calls(), 1, "cached id must short-circuit");
    }

    #[tokio::test]
    async fn test_patient_caches_primary_doctor() {
        let store = fixture_store().await;
        let mut session = session_for(Some("bob.baker@email.com"), Role::Patient);

        assert_eq!(
            resolve(&store, &mut session, Role::Patient).await,
            Identity::Known(ids::PATIENT_BOB)
        );
        assert_eq!(
            session.get_id(SessionKey::PrimaryDoctorId),
            Some(ids::DR_JOHNSON)
        );
    }

    #[tokio::test]
    async fn test_no_email_makes_no_call() {
        let store = CountingStore::new(fixture_store().await);
        let mut session = session_for(None, Role::Nurse);

        assert_eq!(resolve(&store, &mut session, Role::Nurse).await, Identity::Anonymous);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_email_leaves_key_unset() {
        let store = fixture_store().await;
        let mut session = session_for(Some("stranger@mediconnect.com"), Role::Nurse);

        assert_eq!(resolve(&store, &mut session, Role::Nurse).await, Identity::Unresolved);
        assert!(session.get(SessionKey::NurseId).is_none());
    }

    #[tokio::test]
    async fn test_lookup_error_is_not_fatal() {
        let mut session = session_for(Some("emily.brown@mediconnect.com"), Role::Nurse);
        assert_eq!(
            resolve(&FailingStore, &mut session, Role::Nurse).await,
            Identity::Unresolved
        );
    }

    #[test]
    fn test_manual_id_validation() {
        let mut session = session_for(Some("x@y.z"), Role::Doctor);
        assert!(apply_manual_id(&mut session, Role::Doctor, "abc").is_err());
        assert!(apply_manual_id(&mut session, Role::Doctor, "0").is_err());
        assert_eq!(apply_manual_id(&mut session, Role::Doctor, " 5 "), Ok(5));
        assert_eq!(session.get_id(SessionKey::DoctorId), Some(5));
    }
}
