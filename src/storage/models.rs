use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authorization role attached to a user.
///
/// A plain two-variant policy: `Admin` unlocks the cross-user reporting
/// routes, everyone else is a `Member`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Member,
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// Non-secret UUID identifier
    pub id: String,
    /// Argon2 PHC string; never serialized into API responses
    pub password_hash: String,
    pub role: Role,
    /// Globally unique, case-sensitive, immutable after creation
    pub username: String,
}

/// One work session: opened by a start action, closed at most once by a
/// stop action, never deleted or reopened.
///
/// All instants are stored as UTC. A value read back from storage without
/// explicit zone information is interpreted as UTC; no local-clock
/// conversion is ever applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkLog {
    /// Present iff `logout_time` is present; whole minutes, truncated
    /// toward zero, computed at close time and never caller-supplied
    pub duration_minutes: Option<i64>,
    /// Non-secret UUID identifier
    pub id: String,
    /// Set when the session is opened, immutable thereafter
    pub login_time: DateTime<Utc>,
    /// `None` means the session is still open
    pub logout_time: Option<DateTime<Utc>>,
    /// Free text supplied by the caller at close time
    pub pop_description: Option<String>,
    /// Free text supplied by the caller at close time
    pub push_command: Option<String>,
    /// Owning user's id
    pub user_id: String,
}

impl WorkLog {
    /// Whether this log represents a still-running session
    pub fn is_open(&self) -> bool {
        self.logout_time.is_none()
    }

    /// Close the log at `logout_time`.
    ///
    /// `duration_minutes` is the whole number of minutes between login and
    /// logout: integer division of elapsed seconds by 60, truncating toward
    /// zero (32m45s of work records 32 minutes).
    pub fn close(&mut self, logout_time: DateTime<Utc>, pop_description: String, push_command: String) {
        self.duration_minutes = Some((logout_time - self.login_time).num_minutes());
        self.logout_time = Some(logout_time);
        self.pop_description = Some(pop_description);
        self.push_command = Some(push_command);
    }
}
