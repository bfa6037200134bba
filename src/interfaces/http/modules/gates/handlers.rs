//! Gate control handlers
//!
//! The gate and action path segments are validated before anything else
//! happens: an unknown gate or action is rejected with 404 and neither
//! publishes a message nor writes an audit record.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{DispatchDto, GateDto};
use crate::auth::middleware::AuthenticatedUser;
use crate::domain::{GateAction, GateId};
use crate::interfaces::http::common::{domain_error, ApiResponse};
use crate::interfaces::http::SharedGateService;

/// Gate handler state
#[derive(Clone)]
pub struct GateHandlerState {
    pub gates: SharedGateService,
}

#[utoipa::path(
    get,
    path = "/api/v1/gates",
    tag = "Gates",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Known gates", body = ApiResponse<Vec<GateDto>>),
        (status = 401, description = "Not authenticated or outside access window")
    )
)]
pub async fn list_gates() -> Json<ApiResponse<Vec<GateDto>>> {
    let gates = GateId::ALL.iter().copied().map(GateDto::from).collect();
    Json(ApiResponse::success(gates))
}

#[utoipa::path(
    post,
    path = "/api/v1/gates/{gate_id}/{action}",
    tag = "Gates",
    security(("bearer_auth" = [])),
    params(
        ("gate_id" = String, Path, description = "Gate identifier (gate1, gate2, externo, interno)"),
        ("action" = String, Path, description = "open or close")
    ),
    responses(
        (status = 200, description = "Command dispatched", body = ApiResponse<DispatchDto>),
        (status = 401, description = "Not authenticated or outside access window"),
        (status = 404, description = "Unknown gate or action")
    )
)]
pub async fn dispatch_command(
    State(state): State<GateHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((gate_id, action)): Path<(String, String)>,
) -> Result<Json<ApiResponse<DispatchDto>>, (StatusCode, Json<ApiResponse<DispatchDto>>)> {
    let Ok(gate) = gate_id.parse::<GateId>() else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Unknown gate '{}'", gate_id))),
        ));
    };
    let Ok(action) = action.parse::<GateAction>() else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Unknown action '{}'", action))),
        ));
    };

    let outcome = state
        .gates
        .dispatch(gate, action, &user.user_id, &user.username)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(DispatchDto::from(outcome))))
}
