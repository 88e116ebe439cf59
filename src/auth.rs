//! Password hashing, session tokens and credential checks.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::db::{Role, User};
use crate::store::{ClinicStore, StoreError};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes)?;
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generate a random session token
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

/// Hash a token so the session table never holds the raw cookie value
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("This account cannot sign in as {0}")]
    WrongRole(Role),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Check an email/password pair for the role chosen on the home page
pub async fn authenticate(
    store: &dyn ClinicStore,
    email: &str,
    password: &str,
    role: Role,
) -> Result<User, AuthError> {
    // Accounts are stored with lowercase emails
    let email = email.trim().to_lowercase();
    let user = store
        .find_user(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, &user.password) {
        return Err(AuthError::InvalidCredentials);
    }

    if user.role != role.as_str() {
        return Err(AuthError::WrongRole(role));
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("doc123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("doc123", &hash));
        assert!(!verify_password("doc124", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("123r", "not-a-hash"));
    }

    #[test]
    fn test_tokens_are_unique_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_token_is_stable() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }

    #[tokio::test]
    async fn test_authenticate_ignores_email_case_and_padding() {
        let store = crate::store::testing::fixture_store().await;
        let user = authenticate(&store, "  John.Smith@MediConnect.com ", "doc123", Role::Doctor)
            .await
            .unwrap();
        assert_eq!(user.email, "john.smith@mediconnect.com");
    }

    #[tokio::test]
    async fn test_authenticate_password_is_case_sensitive() {
        let store = crate::store::testing::fixture_store().await;
        let err = authenticate(&store, "john.smith@mediconnect.com", "DOC123", Role::Doctor)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}
