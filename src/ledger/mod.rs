//! Session ledger: the work-session state machine and time accounting.
//!
//! A user has at most one open work log at any time. `start` opens one,
//! `stop` closes it and fixes its duration; both lean on the storage layer's
//! single-writer transactions so the check-then-act sequences cannot race.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::storage::models::{User, WorkLog};
use crate::storage::Database;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("You already have an active session.")]
    AlreadyActive,
    #[error("Database error: {0}")]
    Database(#[from] crate::storage::DatabaseError),
    #[error("No active work session found.")]
    NoActiveSession,
}

/// Status of a user's current session
#[derive(Debug, Clone, PartialEq)]
pub enum WorkStatus {
    Active { start_time: DateTime<Utc> },
    Inactive,
}

/// Open a new work session for the user.
///
/// Fails with [`LedgerError::AlreadyActive`] when an open log exists;
/// nothing is written in that case.
pub fn start(db: &Database, user: &User) -> Result<WorkLog, LedgerError> {
    start_at(db, user, Utc::now())
}

/// Open a new work session with an explicit login instant.
pub fn start_at(db: &Database, user: &User, login_time: DateTime<Utc>) -> Result<WorkLog, LedgerError> {
    let log = WorkLog {
        duration_minutes: None,
        id: uuid::Uuid::new_v4().to_string(),
        login_time,
        logout_time: None,
        pop_description: None,
        push_command: None,
        user_id: user.id.clone(),
    };

    if !db.insert_open_work_log(&log)? {
        return Err(LedgerError::AlreadyActive);
    }

    tracing::debug!(log_id = %log.id, user_id = %user.id, "Opened work session");
    Ok(log)
}

/// Close the user's open work session.
///
/// Sets the logout instant, computes the duration in whole minutes
/// (truncated toward zero) and records the caller-supplied descriptions.
/// All four fields commit atomically together with the removal of the
/// open-session marker.
pub fn stop(
    db: &Database,
    user: &User,
    pop_description: String,
    push_command: String,
) -> Result<WorkLog, LedgerError> {
    stop_at(db, user, Utc::now(), pop_description, push_command)
}

/// Close the user's open work session with an explicit logout instant.
pub fn stop_at(
    db: &Database,
    user: &User,
    logout_time: DateTime<Utc>,
    pop_description: String,
    push_command: String,
) -> Result<WorkLog, LedgerError> {
    let closed = db.close_open_work_log(&user.id, |log| {
        log.close(logout_time, pop_description, push_command);
    })?;

    match closed {
        Some(log) => {
            tracing::debug!(
                log_id = %log.id,
                user_id = %user.id,
                duration_minutes = log.duration_minutes,
                "Closed work session"
            );
            Ok(log)
        }
        None => Err(LedgerError::NoActiveSession),
    }
}

/// All of the user's work logs, most recent session first
pub fn list(db: &Database, user: &User) -> Result<Vec<WorkLog>, LedgerError> {
    let mut logs = db.get_work_logs_by_user(&user.id)?;
    logs.sort_by(|a, b| b.login_time.cmp(&a.login_time));
    Ok(logs)
}

/// Whether the user currently has an open session.
///
/// Reports only the start instant; a duration exists only once the session
/// is closed.
pub fn status(db: &Database, user: &User) -> Result<WorkStatus, LedgerError> {
    match db.get_open_work_log(&user.id)? {
        Some(log) => Ok(WorkStatus::Active {
            start_time: log.login_time,
        }),
        None => Ok(WorkStatus::Inactive),
    }
}

/// All work logs across all users joined with their owners, most recent
/// session first.
///
/// A log whose owner cannot be resolved is skipped rather than reported;
/// the admin view only shows rows with intact user references.
pub fn list_all(db: &Database) -> Result<Vec<(WorkLog, User)>, LedgerError> {
    let mut logs = db.get_all_work_logs()?;
    logs.sort_by(|a, b| b.login_time.cmp(&a.login_time));

    let mut joined = Vec::with_capacity(logs.len());
    for log in logs {
        match db.get_user_by_id(&log.user_id)? {
            Some(user) => joined.push((log, user)),
            None => {
                tracing::warn!(log_id = %log.id, user_id = %log.user_id, "Skipping log with unresolvable user");
            }
        }
    }

    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{make_user, setup_db};
    use chrono::TimeZone;

    #[test]
    fn test_start_then_stop_closes_session() {
        let (db, _temp) = setup_db();
        let user = make_user("u1", "alice");
        db.insert_user(&user).unwrap();

        let log = start(&db, &user).unwrap();
        assert!(log.is_open());
        assert_eq!(log.user_id, user.id);

        let closed = stop(&db, &user, "fixed the build".into(), "git push".into()).unwrap();
        assert_eq!(closed.id, log.id);
        assert!(!closed.is_open());
        assert!(closed.duration_minutes.is_some());
        assert_eq!(closed.pop_description.as_deref(), Some("fixed the build"));
        assert_eq!(closed.push_command.as_deref(), Some("git push"));
    }

    #[test]
    fn test_second_start_fails_while_active() {
        let (db, _temp) = setup_db();
        let user = make_user("u1", "alice");
        db.insert_user(&user).unwrap();

        start(&db, &user).unwrap();
        assert!(matches!(
            start(&db, &user),
            Err(LedgerError::AlreadyActive)
        ));

        // Only one log was persisted
        let logs = list(&db, &user).unwrap();
        assert_eq!(logs.len(), 1);
    }

    #[test]
    fn test_stop_without_start_fails() {
        let (db, _temp) = setup_db();
        let user = make_user("u1", "alice");
        db.insert_user(&user).unwrap();

        assert!(matches!(
            stop(&db, &user, "desc".into(), "cmd".into()),
            Err(LedgerError::NoActiveSession)
        ));
        assert!(list(&db, &user).unwrap().is_empty());
    }

    #[test]
    fn test_duration_truncates_toward_zero() {
        let (db, _temp) = setup_db();
        let user = make_user("u1", "alice");
        db.insert_user(&user).unwrap();

        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 32, 45).unwrap();

        start_at(&db, &user, t0).unwrap();
        let closed = stop_at(&db, &user, t1, "desc".into(), "cmd".into()).unwrap();

        // 32m45s records 32, not 33
        assert_eq!(closed.duration_minutes, Some(32));
        assert_eq!(closed.login_time, t0);
        assert_eq!(closed.logout_time, Some(t1));
    }

    #[test]
    fn test_restart_after_stop_is_allowed() {
        let (db, _temp) = setup_db();
        let user = make_user("u1", "alice");
        db.insert_user(&user).unwrap();

        start(&db, &user).unwrap();
        stop(&db, &user, "a".into(), "b".into()).unwrap();
        start(&db, &user).unwrap();

        let logs = list(&db, &user).unwrap();
        assert_eq!(logs.len(), 2);
        let open: Vec<_> = logs.iter().filter(|l| l.is_open()).collect();
        assert_eq!(open.len(), 1);
    }

    #[test]
    fn test_list_orders_most_recent_first() {
        let (db, _temp) = setup_db();
        let user = make_user("u1", "alice");
        db.insert_user(&user).unwrap();

        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap();

        start_at(&db, &user, t0).unwrap();
        stop_at(&db, &user, t1, "a".into(), "b".into()).unwrap();
        start_at(&db, &user, t2).unwrap();

        let logs = list(&db, &user).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].login_time, t2);
        assert_eq!(logs[1].login_time, t0);
    }

    #[test]
    fn test_status_reports_start_time_only_while_active() {
        let (db, _temp) = setup_db();
        let user = make_user("u1", "alice");
        db.insert_user(&user).unwrap();

        assert_eq!(status(&db, &user).unwrap(), WorkStatus::Inactive);

        let t0 = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        start_at(&db, &user, t0).unwrap();
        assert_eq!(
            status(&db, &user).unwrap(),
            WorkStatus::Active { start_time: t0 }
        );

        stop(&db, &user, "a".into(), "b".into()).unwrap();
        assert_eq!(status(&db, &user).unwrap(), WorkStatus::Inactive);
    }

    #[test]
    fn test_list_all_joins_and_skips_dangling_users() {
        let (db, _temp) = setup_db();
        let alice = make_user("u1", "alice");
        let bob = make_user("u2", "bob");
        db.insert_user(&alice).unwrap();
        db.insert_user(&bob).unwrap();

        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        start_at(&db, &alice, t0).unwrap();
        start_at(&db, &bob, t1).unwrap();

        // A log owned by nobody is excluded from the admin join
        let ghost = make_user("u3", "ghost");
        let orphan = WorkLog {
            duration_minutes: None,
            id: "orphan".to_string(),
            login_time: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            logout_time: None,
            pop_description: None,
            push_command: None,
            user_id: ghost.id.clone(),
        };
        db.insert_open_work_log(&orphan).unwrap();

        let all = list_all(&db).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].1.username, "bob");
        assert_eq!(all[1].1.username, "alice");
    }

    #[test]
    fn test_concurrent_starts_create_exactly_one_open_log() {
        let (db, _temp) = setup_db();
        let user = make_user("u1", "alice");
        db.insert_user(&user).unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let db = db.clone();
            let user = user.clone();
            handles.push(std::thread::spawn(move || start(&db, &user).is_ok()));
        }

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);

        let logs = list(&db, &user).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs.iter().filter(|l| l.is_open()).count(), 1);
    }
}
