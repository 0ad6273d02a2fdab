use redb::TableDefinition;

/// Users: username -> User (msgpack). Keying by username makes the
/// uniqueness check and the insert a single-table operation.
pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Secondary index: user id -> username (for resolving WorkLog owners)
pub const USER_IDS: TableDefinition<&str, &str> = TableDefinition::new("user_ids");

/// Work logs: log id -> WorkLog (msgpack)
pub const WORK_LOGS: TableDefinition<&str, &[u8]> = TableDefinition::new("work_logs");

/// Secondary index: user id -> Vec<log id> (for listing a user's logs)
pub const USER_WORK_LOGS: TableDefinition<&str, &[u8]> = TableDefinition::new("user_work_logs");

/// Open-session marker: user id -> open log id.
///
/// At most one entry per user may exist; the entry is created together with
/// an open log and removed when that log is closed. redb admits a single
/// write transaction at a time, so the check-then-insert against this table
/// is serialized and two concurrent starts cannot both succeed.
pub const OPEN_SESSIONS: TableDefinition<&str, &str> = TableDefinition::new("open_sessions");
