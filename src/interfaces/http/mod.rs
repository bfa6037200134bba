//! HTTP interface: REST API modules, router and shared response types.

pub mod common;
pub mod modules;
pub mod router;

use std::sync::Arc;

pub use common::{ApiResponse, PaginatedResponse, PaginationParams};
pub use router::{create_api_router, ApiDoc, RouterDeps};

use crate::application::{GateService, UserService};
use crate::infrastructure::database::repositories::{LogRepository, UserRepository};

/// User service wired to the SQL repository, as the handlers see it.
pub type SharedUserService = Arc<UserService<UserRepository>>;

/// Gate service wired to the SQL audit repository.
pub type SharedGateService = Arc<GateService<LogRepository>>;
