//! Campaign request/response types

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::{CampaignStatus, ResetFrequency};

/// Body for `POST /api/campaigns`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCampaignRequest {
    #[validate(length(min = 3, max = 120))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// Price of a single vote in minor currency units
    #[validate(range(min = 1))]
    pub amount_per_vote: i64,

    #[serde(default)]
    pub is_private: bool,

    pub reset_frequency: ResetFrequency,

    #[validate(range(min = 1, max = 365))]
    pub custom_reset_days: Option<i32>,

    #[serde(default)]
    pub auto_reset_enabled: bool,
}

/// Body for `PUT /api/campaigns/:id`
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCampaignRequest {
    #[validate(length(min = 3, max = 120))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 1))]
    pub amount_per_vote: Option<i64>,

    pub is_private: Option<bool>,
}

/// Query parameters for `GET /api/campaigns`
#[derive(Debug, Default, Deserialize)]
pub struct ListCampaignsQuery {
    pub status: Option<CampaignStatus>,
    pub organizer_id: Option<Uuid>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

/// Body for `POST /api/campaigns/:id/categories`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

/// Body for `POST /api/campaigns/:id/nominees`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNomineeRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    /// Short code used on USSD menus and result boards
    #[validate(length(min = 2, max = 12))]
    pub code: String,

    pub category_id: Option<Uuid>,
}
