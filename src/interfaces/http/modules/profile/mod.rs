//! Profile endpoints: own account info and profile image upload.

pub mod handlers;

pub use handlers::*;
