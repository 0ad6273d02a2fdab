mod admin;
mod auth;
mod work;

pub use admin::{admin_logs, admin_users, health};
pub use auth::{login, me, register};
pub use work::{list_logs, start_work, stop_work, work_status};
