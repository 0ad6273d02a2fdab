use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::User;
use super::tables::*;

impl Database {
    // ========================================================================
    // User operations
    // ========================================================================

    /// Insert a new user, keyed by username.
    ///
    /// Returns `false` without writing anything when the username is already
    /// taken (exact, case-sensitive match). The existence check and the
    /// insert run inside one write transaction, so two concurrent
    /// registrations for the same username cannot both succeed.
    pub fn insert_user(&self, user: &User) -> Result<bool, DatabaseError> {
        debug_assert!(!user.username.is_empty(), "username must not be empty");
        debug_assert!(!user.id.is_empty(), "user id must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(USERS)?;
            if table.get(user.username.as_str())?.is_some() {
                return Ok(false);
            }
            let data = rmp_serde::to_vec_named(user)?;
            table.insert(user.username.as_str(), data.as_slice())?;

            let mut id_table = write_txn.open_table(USER_IDS)?;
            id_table.insert(user.id.as_str(), user.username.as_str())?;
        }
        write_txn.commit()?;
        Ok(true)
    }

    /// Get a user by username (exact match)
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(USERS)?;

        match table.get(username)? {
            Some(data) => {
                let user: User = rmp_serde::from_slice(data.value())?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Get a user by id (resolves id -> username -> user)
    pub fn get_user_by_id(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let id_table = read_txn.open_table(USER_IDS)?;

        let username = match id_table.get(id)? {
            Some(v) => v.value().to_string(),
            None => return Ok(None),
        };

        let table = read_txn.open_table(USERS)?;
        match table.get(username.as_str())? {
            Some(data) => {
                let user: User = rmp_serde::from_slice(data.value())?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Get all users, in username order
    pub fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(USERS)?;

        let mut users = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let user: User = rmp_serde::from_slice(value.value())?;
            users.push(user);
        }

        Ok(users)
    }
}
