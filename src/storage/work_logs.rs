use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::WorkLog;
use super::tables::*;

impl Database {
    // ========================================================================
    // Work log operations
    // ========================================================================

    /// Insert a new open work log for its user.
    ///
    /// Returns `false` without writing anything when the user already has an
    /// open log. The open-session check and the insert run inside a single
    /// write transaction; redb serializes writers, so two concurrent starts
    /// for the same user cannot both observe "no open session".
    pub fn insert_open_work_log(&self, log: &WorkLog) -> Result<bool, DatabaseError> {
        debug_assert!(log.is_open(), "log must be open on insert");
        debug_assert!(!log.user_id.is_empty(), "log user_id must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut open_table = write_txn.open_table(OPEN_SESSIONS)?;
            if open_table.get(log.user_id.as_str())?.is_some() {
                return Ok(false);
            }
            open_table.insert(log.user_id.as_str(), log.id.as_str())?;

            let mut table = write_txn.open_table(WORK_LOGS)?;
            let data = rmp_serde::to_vec_named(log)?;
            table.insert(log.id.as_str(), data.as_slice())?;

            // Update the per-user index
            let mut index_table = write_txn.open_table(USER_WORK_LOGS)?;
            let mut log_ids: Vec<String> = index_table
                .get(log.user_id.as_str())?
                .map(|v| rmp_serde::from_slice(v.value()))
                .transpose()?
                .unwrap_or_default();

            if !log_ids.contains(&log.id) {
                log_ids.push(log.id.clone());
                let index_data = rmp_serde::to_vec_named(&log_ids)?;
                index_table.insert(log.user_id.as_str(), index_data.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(true)
    }

    /// Close the user's open work log by applying `close` to it.
    ///
    /// Returns `Ok(None)` when the user has no open log. The lookup, the
    /// mutation, and the removal of the open-session marker commit as one
    /// write transaction; a log with `logout_time` set but no duration is
    /// never observable.
    pub fn close_open_work_log<F>(
        &self,
        user_id: &str,
        close: F,
    ) -> Result<Option<WorkLog>, DatabaseError>
    where
        F: FnOnce(&mut WorkLog),
    {
        let write_txn = self.begin_write()?;

        let log_id: Option<String> = {
            let open_table = write_txn.open_table(OPEN_SESSIONS)?;
            let id = open_table.get(user_id)?.map(|v| v.value().to_string());
            id
        };

        let closed = match log_id {
            Some(log_id) => {
                let log: Option<WorkLog> = {
                    let table = write_txn.open_table(WORK_LOGS)?;
                    let found = match table.get(log_id.as_str())? {
                        Some(data) => Some(rmp_serde::from_slice(data.value())?),
                        None => None,
                    };
                    found
                };

                let mut log = match log {
                    Some(log) => log,
                    None => {
                        // Stale marker with no backing log: clear it and
                        // report no open session.
                        let mut open_table = write_txn.open_table(OPEN_SESSIONS)?;
                        open_table.remove(user_id)?;
                        drop(open_table);
                        write_txn.commit()?;
                        return Ok(None);
                    }
                };

                close(&mut log);
                debug_assert!(!log.is_open(), "close must set logout_time");

                {
                    let mut table = write_txn.open_table(WORK_LOGS)?;
                    let data = rmp_serde::to_vec_named(&log)?;
                    table.insert(log_id.as_str(), data.as_slice())?;
                }
                {
                    let mut open_table = write_txn.open_table(OPEN_SESSIONS)?;
                    open_table.remove(user_id)?;
                }

                Some(log)
            }
            None => None,
        };

        if closed.is_some() {
            write_txn.commit()?;
        }
        Ok(closed)
    }

    /// Get the user's open work log, if any
    pub fn get_open_work_log(&self, user_id: &str) -> Result<Option<WorkLog>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let open_table = read_txn.open_table(OPEN_SESSIONS)?;

        let log_id = match open_table.get(user_id)? {
            Some(v) => v.value().to_string(),
            None => return Ok(None),
        };

        let table = read_txn.open_table(WORK_LOGS)?;
        match table.get(log_id.as_str())? {
            Some(data) => {
                let log: WorkLog = rmp_serde::from_slice(data.value())?;
                Ok(Some(log))
            }
            None => Ok(None),
        }
    }

    /// Get all work logs for a user, in insertion order
    pub fn get_work_logs_by_user(&self, user_id: &str) -> Result<Vec<WorkLog>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let index_table = read_txn.open_table(USER_WORK_LOGS)?;
        let logs_table = read_txn.open_table(WORK_LOGS)?;

        let log_ids: Vec<String> = match index_table.get(user_id)? {
            Some(data) => rmp_serde::from_slice(data.value())?,
            None => return Ok(Vec::new()),
        };

        let mut logs = Vec::new();
        for log_id in log_ids {
            if let Some(data) = logs_table.get(log_id.as_str())? {
                let log: WorkLog = rmp_serde::from_slice(data.value())?;
                logs.push(log);
            }
        }

        Ok(logs)
    }

    /// Get all work logs across all users
    pub fn get_all_work_logs(&self) -> Result<Vec<WorkLog>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(WORK_LOGS)?;

        let mut logs = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let log: WorkLog = rmp_serde::from_slice(value.value())?;
            logs.push(log);
        }

        Ok(logs)
    }
}
