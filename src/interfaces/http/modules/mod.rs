//! HTTP endpoint modules, one per resource.

pub mod auth;
pub mod gates;
pub mod health;
pub mod logs;
pub mod metrics;
pub mod profile;
pub mod users;
