//! Audit log handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::dto::LogEntryDto;
use crate::domain::LogRepositoryInterface;
use crate::infrastructure::database::repositories::LogRepository;
use crate::interfaces::http::common::{
    domain_error, ApiResponse, PaginatedResponse, PaginationParams,
};

/// Log handler state
#[derive(Clone)]
pub struct LogHandlerState {
    pub logs: Arc<LogRepository>,
}

#[utoipa::path(
    get,
    path = "/api/v1/logs",
    tag = "Audit Log",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Audit records, newest first", body = ApiResponse<PaginatedResponse<LogEntryDto>>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_logs(
    State(state): State<LogHandlerState>,
    Query(params): Query<PaginationParams>,
) -> Result<
    Json<ApiResponse<PaginatedResponse<LogEntryDto>>>,
    (StatusCode, Json<ApiResponse<PaginatedResponse<LogEntryDto>>>),
> {
    let page = state
        .logs
        .list(params.page, params.page_size)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(page.into())))
}
