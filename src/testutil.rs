//! Shared test helpers — available to all `#[cfg(test)]` modules in the crate.

use chrono::Utc;
use tempfile::TempDir;

use crate::storage::models::{Role, User};
use crate::storage::Database;

/// Open a fresh database in a temporary directory.
///
/// Returns both the `Database` and the `TempDir` guard — the caller must
/// keep the `TempDir` alive for the duration of the test.
pub fn setup_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(temp_dir.path()).unwrap();
    (db, temp_dir)
}

/// Create a `User` with the given id and username.
pub fn make_user(id: &str, username: &str) -> User {
    User {
        created_at: Utc::now(),
        id: id.to_string(),
        password_hash: format!("phc_{id}"),
        role: Role::Member,
        username: username.to_string(),
    }
}
