//! Voting period request/response types and stats structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{PeriodResetLog, ResetFrequency, VotingPeriod};

/// A vote record restricted to one period, as consumed by the stats
/// aggregator. Fetched with the nominee name joined in so aggregation
/// itself needs no I/O.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PeriodVote {
    pub nominee_id: Uuid,
    pub nominee_name: String,
    pub voter_identifier: String,
    pub vote_count: i32,
    pub amount: i64,
}

/// Closing totals for a voting period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub total_votes: i64,
    pub total_revenue: i64,
    pub total_voters: i64,
    pub per_nominee: Vec<NomineeStats>,
}

impl PeriodStats {
    /// Stats for a period with no votes
    pub fn empty() -> Self {
        Self {
            total_votes: 0,
            total_revenue: 0,
            total_voters: 0,
            per_nominee: Vec::new(),
        }
    }
}

/// Per-nominee breakdown within a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NomineeStats {
    pub nominee_id: Uuid,
    pub name: String,
    pub votes: i64,
    pub revenue: i64,
}

/// Who triggered a reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetActor {
    User(Uuid),
    System,
}

impl ResetActor {
    /// Database representation: `user:<uuid>` or `system`
    pub fn as_db_value(&self) -> String {
        match self {
            ResetActor::User(id) => format!("user:{}", id),
            ResetActor::System => "system".to_string(),
        }
    }
}

/// Body for `POST /api/campaigns/:id/reset-votes`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ResetVotesRequest {
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Body for `PUT /api/campaigns/:id/reset-policy`
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPolicyRequest {
    pub reset_type: ResetFrequency,
    /// Required when `reset_type` is `custom`
    #[validate(range(min = 1, max = 365))]
    pub custom_days: Option<i32>,
    pub auto_reset_enabled: bool,
}

/// Result of a completed period transition
#[derive(Debug, Serialize)]
pub struct ResetOutcome {
    pub new_period: VotingPeriod,
    pub previous_stats: PeriodStats,
    pub next_reset: Option<DateTime<Utc>>,
}

/// Response for `GET /api/campaigns/:id/reset-votes`
#[derive(Debug, Serialize)]
pub struct PeriodOverview {
    pub active_period: Option<VotingPeriod>,
    pub history: Vec<VotingPeriod>,
    pub reset_logs: Vec<PeriodResetLog>,
    pub can_reset: bool,
}

/// Per-campaign result within an automatic reset scan
#[derive(Debug, Serialize)]
pub struct CampaignResetResult {
    pub campaign_id: Uuid,
    pub campaign_title: String,
    pub success: bool,
    pub new_period_number: Option<i32>,
    pub error: Option<String>,
}

/// Summary returned by the automatic reset scan
#[derive(Debug, Serialize)]
pub struct AutoResetSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<CampaignResetResult>,
}
