//! SeaORM-backed repository implementations

pub mod log_repository;
pub mod user_repository;

pub use log_repository::LogRepository;
pub use user_repository::UserRepository;
