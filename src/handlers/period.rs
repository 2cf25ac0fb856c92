//! Voting period reset API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiResult;
use crate::middleware::{AuthenticatedUser, CronAuth};
use crate::models::{ApiResponse, Campaign, CampaignStatus};
use crate::period::{
    AutoResetSummary, PeriodOverview, ResetActor, ResetOutcome, ResetPolicyRequest,
    ResetVotesRequest,
};
use crate::state::AppState;

/// Trigger a reset of the campaign's voting period using its stored policy
pub async fn reset_votes(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ResetVotesRequest>,
) -> ApiResult<Json<ApiResponse<ResetOutcome>>> {
    request.validate()?;

    let campaign = app_state
        .campaign_service
        .get_owned_campaign(id, &user)
        .await?;

    let outcome = app_state
        .period_service
        .reset_period(&campaign, ResetActor::User(user.user_id), request.notes)
        .await?;

    Ok(Json(ApiResponse::ok(outcome)))
}

/// Current and historical periods for a campaign, with a `can_reset` flag
pub async fn get_reset_overview(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<PeriodOverview>>> {
    let campaign = app_state
        .campaign_service
        .get_owned_campaign(id, &user)
        .await?;

    let can_reset = campaign.status == CampaignStatus::Active;
    let overview = app_state
        .period_service
        .overview(&campaign, can_reset)
        .await?;

    Ok(Json(ApiResponse::ok(overview)))
}

/// Change the campaign's recurring reset policy without touching periods
pub async fn update_reset_policy(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ResetPolicyRequest>,
) -> ApiResult<Json<ApiResponse<Campaign>>> {
    request.validate()?;

    let campaign = app_state
        .campaign_service
        .get_owned_campaign(id, &user)
        .await?;

    let updated = app_state
        .period_service
        .update_reset_policy(&campaign, &request)
        .await?;

    Ok(Json(ApiResponse::ok(updated)))
}

/// Rehearse the scheduled reset path for one campaign, organizer-triggered
pub async fn test_auto_reset(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ResetOutcome>>> {
    let campaign = app_state
        .campaign_service
        .get_owned_campaign(id, &user)
        .await?;

    let outcome = app_state
        .period_service
        .reset_period(&campaign, ResetActor::System, None)
        .await?;

    Ok(Json(ApiResponse::ok(outcome)))
}

/// Scan and reset all due campaigns. Scheduler-only.
pub async fn auto_reset_votes(
    State(app_state): State<AppState>,
    _cron: CronAuth,
) -> ApiResult<Json<ApiResponse<AutoResetSummary>>> {
    let summary = app_state.period_service.run_due_resets().await?;

    tracing::info!(
        processed = summary.processed,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Automatic reset scan completed"
    );

    Ok(Json(ApiResponse::ok(summary)))
}
