//! Core domain types and repository contracts.

pub mod access;
pub mod error;
pub mod gate;
pub mod log;
pub mod user;

pub use access::AccessWindow;
pub use error::{DomainError, DomainResult};
pub use gate::{GateAction, GateId};
pub use log::{LogEntry, LogRepositoryInterface, NewLogEntry};
pub use user::{CreateUserDto, UpdateUserDto, User, UserRepositoryInterface, UserRole};

/// A page of results plus pagination metadata.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, page_size: u32) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
        }
    }
}
