//! Audit log endpoints (admin only).

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
