//! Vote request/response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::VoteStatus;
use crate::period::PeriodStats;

/// Body for `POST /api/campaigns/:id/votes`
#[derive(Debug, Deserialize, Validate)]
pub struct CastVoteRequest {
    pub nominee_id: Uuid,

    /// Stable voter identity (phone number or anonymous tag)
    #[validate(length(min = 3, max = 64))]
    pub voter_identifier: String,

    /// Email forwarded to the payment gateway for the checkout session
    #[validate(email)]
    pub email: String,

    #[validate(range(min = 1, max = 10000))]
    pub vote_count: i32,
}

/// Response for `POST /api/campaigns/:id/votes`
#[derive(Debug, Serialize)]
pub struct CastVoteResponse {
    pub vote_id: Uuid,
    pub reference: String,
    /// Hosted checkout URL the voter is redirected to
    pub authorization_url: String,
    pub amount: i64,
    pub status: VoteStatus,
}

/// Query parameters for `GET /api/campaigns/:id/votes`
#[derive(Debug, Default, Deserialize)]
pub struct ListVotesQuery {
    pub status: Option<VoteStatus>,
    pub nominee_id: Option<Uuid>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

/// Response for `GET /api/campaigns/:id/results`
#[derive(Debug, Serialize)]
pub struct CampaignResults {
    pub campaign_id: Uuid,
    pub period_number: i32,
    pub stats: PeriodStats,
}
