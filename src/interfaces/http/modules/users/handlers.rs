//! User administration handlers
//!
//! All routes here sit behind both the auth and the admin middleware.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use super::dto::{
    parse_role, parse_time_opt, CreateUserRequest, ResetPasswordRequest, UpdateUserRequest, UserDto,
};
use crate::auth::middleware::AuthenticatedUser;
use crate::domain::{CreateUserDto, UpdateUserDto};
use crate::interfaces::http::common::{
    domain_error, ApiResponse, PaginatedResponse, PaginationParams,
};
use crate::interfaces::http::SharedUserService;

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub users: SharedUserService,
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated user list", body = ApiResponse<PaginatedResponse<UserDto>>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Query(params): Query<PaginationParams>,
) -> Result<
    Json<ApiResponse<PaginatedResponse<UserDto>>>,
    (StatusCode, Json<ApiResponse<PaginatedResponse<UserDto>>>),
> {
    let page = state
        .users
        .list_users(params.page, params.page_size)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(page.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), (StatusCode, Json<ApiResponse<UserDto>>)> {
    if let Err(e) = request.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ));
    }

    let role = parse_role(&request.role)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e))))?;
    let access_start = parse_time_opt(&request.access_start)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e))))?;
    let access_end = parse_time_opt(&request.access_end)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e))))?;

    let user = state
        .users
        .create_user(CreateUserDto {
            username: request.username,
            password: request.password,
            role,
            access_start,
            access_end,
        })
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = ApiResponse<UserDto>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    let user = state
        .users
        .get_user_by_id(&id)
        .await
        .map_err(domain_error)?;

    let Some(user) = user else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ));
    };

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 400, description = "Invalid role or time format"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    let role = parse_role(&request.role)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e))))?;
    let access_start = parse_time_opt(&request.access_start)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e))))?;
    let access_end = parse_time_opt(&request.access_end)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e))))?;

    let user = state
        .users
        .update_access(
            &id,
            UpdateUserDto {
                role,
                access_start,
                access_end,
            },
        )
        .await
        .map_err(domain_error)?;

    let Some(user) = user else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ));
    };

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/password",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User id")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset"),
        (status = 400, description = "Passwords do not match or too short"),
        (status = 404, description = "User not found")
    )
)]
pub async fn reset_password(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .users
        .set_password(&id, &request.new_password, &request.confirm_password)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 403, description = "Cannot delete your own account"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Extension(acting): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .users
        .delete_user(&id, &acting.user_id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(())))
}
