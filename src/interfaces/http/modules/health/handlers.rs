//! Health check handler

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::interfaces::http::common::ApiResponse;

/// Health handler state
#[derive(Clone)]
pub struct HealthState {
    pub db: DatabaseConnection,
}

/// Health check payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service healthy", body = ApiResponse<HealthStatus>),
        (status = 503, description = "Database unreachable")
    )
)]
pub async fn health_check(
    State(state): State<HealthState>,
) -> Result<Json<ApiResponse<HealthStatus>>, (StatusCode, Json<ApiResponse<HealthStatus>>)> {
    let ping = state
        .db
        .execute(Statement::from_string(
            state.db.get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await;

    match ping {
        Ok(_) => Ok(Json(ApiResponse::success(HealthStatus {
            status: "ok".to_string(),
            database: "up".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }))),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::error(format!("Database unreachable: {}", e))),
        )),
    }
}
