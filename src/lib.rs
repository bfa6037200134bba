//! # Gate Central
//!
//! Web service for controlling physical gates over MQTT. Authenticated
//! users trigger open/close commands; non-admin accounts can be restricted
//! to a daily time-of-day access window, and every dispatched command is
//! written to an audit log.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core entities (users, gates, audit log) and repository traits
//! - **application**: Use-case services (identity, gate dispatch)
//! - **infrastructure**: External concerns (SeaORM database, MQTT client)
//! - **auth**: JWT creation/verification and the per-request access policy
//! - **interfaces**: REST API with Swagger documentation

pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::{create_api_router, RouterDeps};
