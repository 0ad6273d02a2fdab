use thiserror::Error;

use crate::storage::models::{Role, User};

#[derive(Debug, Error)]
#[error("Not authorized")]
pub struct Forbidden;

/// Gate for cross-user reporting routes: only `Role::Admin` passes.
pub fn require_admin(user: &User) -> Result<(), Forbidden> {
    if user.role == Role::Admin {
        Ok(())
    } else {
        Err(Forbidden)
    }
}
