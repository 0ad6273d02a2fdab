//! timeclock - a work-hours tracking service
//!
//! This crate provides token-authenticated work-session logging with:
//! - Strictly one open session per user, enforced transactionally
//! - Duration accounting fixed at session close (whole minutes, truncated)
//! - Argon2 password hashing and HS256 bearer tokens
//! - Admin-only cross-user reporting
//! - redb embedded database (ACID, MVCC, crash-safe)
//! - REST API

pub mod api;
pub mod auth;
pub mod config;
pub mod ledger;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use config::Config;
use storage::Database;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub db: Database,
}
