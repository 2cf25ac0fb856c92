//! Analytics API handlers

use axum::{extract::State, Json};

use crate::error::ApiResult;
use crate::middleware::AdminUser;
use crate::models::ApiResponse;
use crate::services::DashboardReport;
use crate::state::AppState;

/// Platform-wide dashboard report (admin only)
pub async fn dashboard(
    State(app_state): State<AppState>,
    AdminUser(_user): AdminUser,
) -> ApiResult<Json<ApiResponse<DashboardReport>>> {
    let report = app_state.analytics_service.dashboard().await?;

    Ok(Json(ApiResponse::ok(report)))
}
