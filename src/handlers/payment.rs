//! Payment API handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::ApiResult;
use crate::models::ApiResponse;
use crate::payment::VerifyPaymentResponse;
use crate::state::AppState;

/// Verify a payment reference against the gateway and apply the local
/// status transition. Safe to call repeatedly.
pub async fn verify_payment(
    State(app_state): State<AppState>,
    Path(reference): Path<String>,
) -> ApiResult<Json<ApiResponse<VerifyPaymentResponse>>> {
    let response = app_state.payment_service.verify_reference(&reference).await?;

    Ok(Json(ApiResponse::ok(response)))
}
