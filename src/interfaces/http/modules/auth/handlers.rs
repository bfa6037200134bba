//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use validator::Validate;

use super::dto::{ChangePasswordRequest, LoginRequest, LoginResponse, UserInfo};
use crate::auth::middleware::AuthenticatedUser;
use crate::interfaces::http::common::{domain_error, ApiResponse};
use crate::interfaces::http::modules::users::dto::UserDto;
use crate::interfaces::http::SharedUserService;

/// Auth handler state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub users: SharedUserService,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many login attempts")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<LoginResponse>>)> {
    if let Err(e) = request.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ));
    }

    let auth = state
        .users
        .login(&request.username, &request.password)
        .await
        .map_err(domain_error)?;

    let response = LoginResponse {
        token: auth.token,
        token_type: auth.token_type,
        expires_in: auth.expires_in,
        user: UserInfo {
            id: auth.user.id,
            username: auth.user.username,
            role: auth.user.role.as_str().to_string(),
        },
    };

    Ok(Json(ApiResponse::success(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user info", body = ApiResponse<UserDto>),
        (status = 401, description = "Not authenticated or outside access window")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    let db_user = state
        .users
        .get_user_by_id(&user.user_id)
        .await
        .map_err(domain_error)?;

    let Some(db_user) = db_user else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ));
    };

    Ok(Json(ApiResponse::success(UserDto::from(db_user))))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Passwords do not match or too short"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .users
        .set_password(&user.user_id, &request.new_password, &request.confirm_password)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(())))
}
