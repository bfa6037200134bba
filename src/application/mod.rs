//! Application services: use-case orchestration over the domain contracts.

pub mod gates;
pub mod identity;

pub use gates::{DispatchOutcome, GateService};
pub use identity::{AuthResult, UserService};
