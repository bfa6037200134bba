//! Audit log DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::LogEntry;

/// One audit record: who issued which command, and when.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogEntryDto {
    pub id: i32,
    pub user_id: String,
    /// Username as it was at dispatch time; kept even if the account is
    /// later deleted.
    pub username: String,
    pub command: String,
    pub timestamp: DateTime<Utc>,
}

impl From<LogEntry> for LogEntryDto {
    fn from(e: LogEntry) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            username: e.username,
            command: e.command,
            timestamp: e.timestamp,
        }
    }
}
