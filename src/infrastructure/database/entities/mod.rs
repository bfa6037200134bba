//! Database entities

pub mod log_entry;
pub mod user;
