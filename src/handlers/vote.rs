//! Vote API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthenticatedUser;
use crate::models::{ApiResponse, Vote};
use crate::state::AppState;
use crate::vote::{CampaignResults, CastVoteRequest, CastVoteResponse, ListVotesQuery};

/// Cast a vote (public). Returns the gateway checkout URL.
pub async fn cast_vote(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CastVoteRequest>,
) -> ApiResult<Json<ApiResponse<CastVoteResponse>>> {
    request.validate()?;

    let campaign = app_state
        .campaign_service
        .get_campaign(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    let response = app_state.vote_service.cast_vote(&campaign, &request).await?;

    Ok(Json(ApiResponse::ok(response)))
}

/// List a campaign's votes (organizer only)
pub async fn list_votes(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<ListVotesQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Vote>>>> {
    let campaign = app_state
        .campaign_service
        .get_owned_campaign(id, &user)
        .await?;

    let votes = app_state.vote_service.list_votes(campaign.id, &query).await?;

    Ok(Json(ApiResponse::ok(votes)))
}

/// Live standings for the campaign's active period (public)
pub async fn campaign_results(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<CampaignResults>>> {
    let campaign = app_state
        .campaign_service
        .get_campaign(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    if campaign.is_private {
        return Err(ApiError::Forbidden(
            "Results for this campaign are private".to_string(),
        ));
    }

    let results = app_state.vote_service.campaign_results(&campaign).await?;

    Ok(Json(ApiResponse::ok(results)))
}
