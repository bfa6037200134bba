//! Authentication middleware for Axum
//!
//! Verifies the bearer token, then reloads the user row and re-applies the
//! time-window policy on every request. The check is deliberately not
//! cached: a user edited, deleted or now outside their window loses access
//! on their very next request, token or not.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::json;

use super::jwt::{verify_token, AuthError, JwtConfig};
use crate::domain::{User, UserRole};
use crate::infrastructure::database::entities::user;

/// Authentication state shared by the middleware layers
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub db: DatabaseConnection,
    /// Reference timezone for the access-window check.
    pub timezone: chrono_tz::Tz,
}

/// Authenticated user information, inserted as a request extension.
///
/// Populated from the freshly loaded database row, not from the token, so
/// role changes take effect immediately.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// JWT authentication middleware - requires a valid token and an account
/// currently allowed to hold a session.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(&auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    let claims = match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => claims,
        Err(_) => return auth_error_response(AuthError::InvalidToken),
    };
    if claims.is_expired() {
        return auth_error_response(AuthError::ExpiredToken);
    }

    // Fresh row on every request, never the token's snapshot.
    let model = match user::Entity::find_by_id(&claims.sub).one(&auth_state.db).await {
        Ok(Some(model)) => model,
        Ok(None) => return auth_error_response(AuthError::UserNotFound),
        Err(e) => {
            tracing::error!("Auth user lookup failed: {}", e);
            return auth_error_response(AuthError::InvalidToken);
        }
    };
    let db_user = User::from(model);

    if let Some(window) = db_user.access_window() {
        if !db_user.is_admin() {
            let now = Utc::now().with_timezone(&auth_state.timezone).time();
            if !window.contains(now) {
                tracing::warn!(
                    username = %db_user.username,
                    "Session rejected: outside permitted access window"
                );
                return auth_error_response(AuthError::OutsideAccessWindow);
            }
        }
    }

    let user = AuthenticatedUser {
        user_id: db_user.id,
        username: db_user.username,
        role: db_user.role,
    };
    request.extensions_mut().insert(user);

    next.run(request).await
}

/// Admin-only middleware - must be layered after `auth_middleware`.
pub async fn admin_middleware(request: Request<Body>, next: Next) -> Response {
    let user = request.extensions().get::<AuthenticatedUser>();

    match user {
        Some(user) if user.is_admin() => next.run(request).await,
        Some(_) => auth_error_response(AuthError::InsufficientPermissions),
        None => auth_error_response(AuthError::MissingToken),
    }
}

/// Create an authentication error response
fn auth_error_response(error: AuthError) -> Response {
    let status = match error {
        AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
        _ => StatusCode::UNAUTHORIZED,
    };

    let body = Json(json!({
        "success": false,
        "error": error.to_string()
    }));

    (status, body).into_response()
}
