//! Campaign, category, and nominee API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::campaign::{
    CreateCampaignRequest, CreateCategoryRequest, CreateNomineeRequest, ListCampaignsQuery,
    UpdateCampaignRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthenticatedUser;
use crate::models::{ApiResponse, Campaign, Category, Nominee};
use crate::state::AppState;

/// Create a new campaign in draft state
pub async fn create_campaign(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateCampaignRequest>,
) -> ApiResult<Json<ApiResponse<Campaign>>> {
    request.validate()?;

    let campaign = app_state
        .campaign_service
        .create_campaign(user.user_id, &request)
        .await?;

    Ok(Json(ApiResponse::ok(campaign)))
}

/// List public campaigns
pub async fn list_campaigns(
    State(app_state): State<AppState>,
    Query(query): Query<ListCampaignsQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Campaign>>>> {
    let campaigns = app_state
        .campaign_service
        .list_campaigns(&query, false)
        .await?;

    Ok(Json(ApiResponse::ok(campaigns)))
}

/// List the caller's own campaigns, private ones included
pub async fn list_my_campaigns(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(mut query): Query<ListCampaignsQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Campaign>>>> {
    query.organizer_id = Some(user.user_id);

    let campaigns = app_state
        .campaign_service
        .list_campaigns(&query, true)
        .await?;

    Ok(Json(ApiResponse::ok(campaigns)))
}

/// Get a single campaign by ID
pub async fn get_campaign(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Campaign>>> {
    let campaign = app_state
        .campaign_service
        .get_campaign(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    Ok(Json(ApiResponse::ok(campaign)))
}

/// Update campaign attributes (organizer only)
pub async fn update_campaign(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCampaignRequest>,
) -> ApiResult<Json<ApiResponse<Campaign>>> {
    request.validate()?;

    let campaign = app_state
        .campaign_service
        .get_owned_campaign(id, &user)
        .await?;

    let updated = app_state
        .campaign_service
        .update_campaign(&campaign, &request)
        .await?;

    Ok(Json(ApiResponse::ok(updated)))
}

/// Activate a draft campaign, opening its first voting period
pub async fn activate_campaign(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Campaign>>> {
    let campaign = app_state
        .campaign_service
        .get_owned_campaign(id, &user)
        .await?;

    let activated = app_state
        .campaign_service
        .activate_campaign(&campaign)
        .await?;

    Ok(Json(ApiResponse::ok(activated)))
}

/// Delete a campaign (refused once it has successful votes)
pub async fn delete_campaign(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let campaign = app_state
        .campaign_service
        .get_owned_campaign(id, &user)
        .await?;

    app_state.campaign_service.delete_campaign(&campaign).await?;

    Ok(Json(ApiResponse::ok(())))
}

// ===== Category handlers =====

/// Create a category within a campaign
pub async fn create_category(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateCategoryRequest>,
) -> ApiResult<Json<ApiResponse<Category>>> {
    request.validate()?;

    let campaign = app_state
        .campaign_service
        .get_owned_campaign(id, &user)
        .await?;

    let category = app_state
        .campaign_service
        .create_category(campaign.id, &request)
        .await?;

    Ok(Json(ApiResponse::ok(category)))
}

/// List a campaign's categories (public view excludes evicted)
pub async fn list_categories(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = app_state
        .campaign_service
        .list_categories(id, false)
        .await?;

    Ok(Json(ApiResponse::ok(categories)))
}

/// Delete a category (refused once it has successful votes)
pub async fn delete_category(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, category_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let campaign = app_state
        .campaign_service
        .get_owned_campaign(id, &user)
        .await?;

    app_state
        .campaign_service
        .delete_category(campaign.id, category_id)
        .await?;

    Ok(Json(ApiResponse::ok(())))
}

/// Soft-hide a category, preserving vote history
pub async fn evict_category(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, category_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ApiResponse<Category>>> {
    let campaign = app_state
        .campaign_service
        .get_owned_campaign(id, &user)
        .await?;

    let category = app_state
        .campaign_service
        .evict_category(campaign.id, category_id)
        .await?;

    Ok(Json(ApiResponse::ok(category)))
}

// ===== Nominee handlers =====

/// Create a nominee within a campaign
pub async fn create_nominee(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateNomineeRequest>,
) -> ApiResult<Json<ApiResponse<Nominee>>> {
    request.validate()?;

    let campaign = app_state
        .campaign_service
        .get_owned_campaign(id, &user)
        .await?;

    let nominee = app_state
        .campaign_service
        .create_nominee(campaign.id, &request)
        .await?;

    Ok(Json(ApiResponse::ok(nominee)))
}

/// List a campaign's nominees (public view excludes evicted)
pub async fn list_nominees(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<Nominee>>>> {
    let nominees = app_state.campaign_service.list_nominees(id, false).await?;

    Ok(Json(ApiResponse::ok(nominees)))
}

/// Delete a nominee (refused once it has successful votes)
pub async fn delete_nominee(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, nominee_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let campaign = app_state
        .campaign_service
        .get_owned_campaign(id, &user)
        .await?;

    app_state
        .campaign_service
        .delete_nominee(campaign.id, nominee_id)
        .await?;

    Ok(Json(ApiResponse::ok(())))
}

/// Soft-hide a nominee, preserving vote history
pub async fn evict_nominee(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, nominee_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ApiResponse<Nominee>>> {
    let campaign = app_state
        .campaign_service
        .get_owned_campaign(id, &user)
        .await?;

    let nominee = app_state
        .campaign_service
        .evict_nominee(campaign.id, nominee_id)
        .await?;

    Ok(Json(ApiResponse::ok(nominee)))
}
