//! Account operations: registration, credential verification, bearer-token
//! resolution, and the startup admin bootstrap.

use chrono::Utc;
use thiserror::Error;

use crate::storage::models::{Role, User};
use crate::storage::Database;

use super::password::{self, PasswordError};
use super::token::{self, TokenError};

/// Username of the bootstrapped administrative account
pub const BOOTSTRAP_USERNAME: &str = "admin";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Database error: {0}")]
    Database(#[from] crate::storage::DatabaseError),
    #[error("Incorrect username or password")]
    InvalidCredentials,
    #[error("Could not validate credentials")]
    InvalidToken,
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error("Token error: {0}")]
    Token(#[from] TokenError),
    #[error("Username already registered")]
    UsernameTaken,
}

/// Create a new member account.
///
/// Fails with [`AuthError::UsernameTaken`] on an exact, case-sensitive
/// duplicate; the check and the insert are atomic in the storage layer.
pub fn register(db: &Database, username: &str, password: &str) -> Result<User, AuthError> {
    let user = User {
        created_at: Utc::now(),
        id: uuid::Uuid::new_v4().to_string(),
        password_hash: password::hash(password)?,
        role: Role::Member,
        username: username.to_string(),
    };

    if !db.insert_user(&user)? {
        return Err(AuthError::UsernameTaken);
    }

    tracing::info!(user_id = %user.id, username = %user.username, "Registered user");
    Ok(user)
}

/// Verify credentials and issue a bearer token.
///
/// An unknown username and a wrong password both surface as the same
/// [`AuthError::InvalidCredentials`], so callers cannot probe which
/// usernames exist.
pub fn login(
    db: &Database,
    secret: &str,
    ttl_seconds: u64,
    username: &str,
    password: &str,
) -> Result<String, AuthError> {
    let user = match db.get_user_by_username(username)? {
        Some(user) => user,
        None => return Err(AuthError::InvalidCredentials),
    };

    if !password::verify(&user.password_hash, password) {
        return Err(AuthError::InvalidCredentials);
    }

    let token = token::issue(secret, &user.username, ttl_seconds)?;
    tracing::debug!(username = %user.username, "Issued bearer token");
    Ok(token)
}

/// Resolve a bearer token to its current user record.
///
/// The subject username is looked up in the store on every call rather than
/// cached, so a token only works while its account exists. A malformed,
/// tampered, or expired token and an unresolvable subject all yield the
/// same [`AuthError::InvalidToken`].
pub fn authenticate(db: &Database, secret: &str, bearer: &str) -> Result<User, AuthError> {
    let subject = token::decode_subject(secret, bearer).map_err(|_| AuthError::InvalidToken)?;

    match db.get_user_by_username(&subject)? {
        Some(user) => Ok(user),
        None => Err(AuthError::InvalidToken),
    }
}

/// Ensure the administrative account exists, creating it on first startup.
///
/// Checked on every startup, created at most once; a concurrent insert of
/// the same username simply makes this a no-op.
pub fn bootstrap_admin(db: &Database, bootstrap_password: &str) -> Result<(), AuthError> {
    if db.get_user_by_username(BOOTSTRAP_USERNAME)?.is_some() {
        return Ok(());
    }

    let user = User {
        created_at: Utc::now(),
        id: uuid::Uuid::new_v4().to_string(),
        password_hash: password::hash(bootstrap_password)?,
        role: Role::Admin,
        username: BOOTSTRAP_USERNAME.to_string(),
    };

    if db.insert_user(&user)? {
        tracing::info!(user_id = %user.id, "Created admin user");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::setup_db;

    #[test]
    fn test_register_and_login() {
        let (db, _temp) = setup_db();

        let user = register(&db, "alice", "wonderland").unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Member);
        assert_ne!(user.password_hash, "wonderland");

        let token = login(&db, "secret", 3600, "alice", "wonderland").unwrap();
        let resolved = authenticate(&db, "secret", &token).unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (db, _temp) = setup_db();

        register(&db, "alice", "first-password").unwrap();
        let before = db.get_user_by_username("alice").unwrap().unwrap();

        assert!(matches!(
            register(&db, "alice", "second-password"),
            Err(AuthError::UsernameTaken)
        ));

        // The original record is untouched
        let after = db.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.password_hash, before.password_hash);
    }

    #[test]
    fn test_usernames_are_case_sensitive() {
        let (db, _temp) = setup_db();

        register(&db, "alice", "pw").unwrap();
        register(&db, "Alice", "pw").unwrap();

        assert!(db.get_user_by_username("alice").unwrap().is_some());
        assert!(db.get_user_by_username("Alice").unwrap().is_some());
    }

    #[test]
    fn test_bad_credentials_are_indistinguishable() {
        let (db, _temp) = setup_db();
        register(&db, "alice", "wonderland").unwrap();

        let wrong_password = login(&db, "secret", 3600, "alice", "nope").unwrap_err();
        let unknown_user = login(&db, "secret", 3600, "nobody", "nope").unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_authenticate_rejects_garbage() {
        let (db, _temp) = setup_db();
        register(&db, "alice", "wonderland").unwrap();

        assert!(matches!(
            authenticate(&db, "secret", "garbage"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_authenticate_requires_existing_subject() {
        let (db, _temp) = setup_db();

        // Valid signature, but the subject was never registered
        let token = token::issue("secret", "phantom", 3600).unwrap();
        assert!(matches!(
            authenticate(&db, "secret", &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_bootstrap_admin_is_idempotent() {
        let (db, _temp) = setup_db();

        bootstrap_admin(&db, "1234").unwrap();
        let first = db.get_user_by_username(BOOTSTRAP_USERNAME).unwrap().unwrap();
        assert_eq!(first.role, Role::Admin);

        bootstrap_admin(&db, "1234").unwrap();
        let second = db.get_user_by_username(BOOTSTRAP_USERNAME).unwrap().unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(db.list_users().unwrap().len(), 1);
    }
}
