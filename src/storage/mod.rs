pub mod db;
pub mod models;
mod tables;
mod users;
mod work_logs;

pub use db::{Database, DatabaseError};
