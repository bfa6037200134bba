//! Audit log domain model and repository contract.
//!
//! One entry is appended per successfully dispatched gate command. Entries
//! are immutable: the repository deliberately exposes only append and list.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::DomainResult;
use super::PaginatedResult;

/// A single audit record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: i32,
    pub user_id: String,
    /// Denormalized so the entry survives user deletion.
    pub username: String,
    pub command: String,
    pub timestamp: DateTime<Utc>,
}

/// Data for a new audit record
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub user_id: String,
    pub username: String,
    pub command: String,
}

/// Audit log persistence contract (append-only)
#[async_trait]
pub trait LogRepositoryInterface: Send + Sync {
    async fn append(&self, entry: NewLogEntry) -> DomainResult<LogEntry>;
    /// Newest first.
    async fn list(&self, page: u32, page_size: u32) -> DomainResult<PaginatedResult<LogEntry>>;
}
