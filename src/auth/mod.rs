//! Authentication: JWT tokens, password hashing and request middleware.

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{create_token, verify_token, AuthError, Claims, JwtConfig};
pub use middleware::{admin_middleware, auth_middleware, AuthState, AuthenticatedUser};
pub use password::{hash_password, verify_password};
