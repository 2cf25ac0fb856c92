//! Data models for the Towaba backend

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// User model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User roles
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Voter,
    Organizer,
    Admin,
}

/// Campaign model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Campaign {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: CampaignStatus,
    pub is_private: bool,
    /// Price of a single vote in minor currency units
    pub amount_per_vote: i64,
    pub reset_frequency: ResetFrequency,
    pub custom_reset_days: Option<i32>,
    pub auto_reset_enabled: bool,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub next_auto_reset: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Campaign status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "campaign_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Active,
    Ended,
    Suspended,
}

/// How often a campaign's voting period rolls over
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "reset_frequency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResetFrequency {
    Weekly,
    Monthly,
    Custom,
    Manual,
}

impl ResetFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetFrequency::Weekly => "weekly",
            ResetFrequency::Monthly => "monthly",
            ResetFrequency::Custom => "custom",
            ResetFrequency::Manual => "manual",
        }
    }
}

/// Category model (groups nominees within a campaign)
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Category {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub name: String,
    pub evicted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Nominee model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Nominee {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    /// Short code used on USSD menus and result boards
    pub code: String,
    pub evicted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Voting period model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct VotingPeriod {
    pub id: Uuid,
    pub campaign_id: Uuid,
    /// Monotonic per campaign, starting at 1
    pub period_number: i32,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub status: PeriodStatus,
    pub total_votes: Option<i64>,
    pub total_revenue: Option<i64>,
    pub total_voters: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Voting period status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "period_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    Active,
    Completed,
}

/// Vote model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Vote {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub nominee_id: Uuid,
    pub period_id: Option<Uuid>,
    /// Stable voter identity (phone number or anonymous tag)
    pub voter_identifier: String,
    pub vote_count: i32,
    pub amount: i64,
    pub status: VoteStatus,
    pub payment_reference: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vote status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "vote_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VoteStatus {
    Pending,
    Success,
    Failed,
    Refunded,
}

/// Payment model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub vote_id: Uuid,
    pub reference: String,
    pub provider: PaymentProvider,
    pub amount: i64,
    pub status: PaymentStatus,
    pub channel: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payment provider
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "payment_provider", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    Paystack,
    Ussd,
}

/// Payment status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
    Refunded,
}

/// Period reset audit log model (write-once)
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct PeriodResetLog {
    pub id: Uuid,
    pub campaign_id: Uuid,
    /// The newly opened period
    pub period_id: Uuid,
    pub reset_type: ResetFrequency,
    /// `user:<uuid>` for organizer-triggered resets, `system` for the scheduler
    pub triggered_by: String,
    /// Closing stats of the previous period
    pub previous_stats: serde_json::Value,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Pagination parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

/// Paginated response
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i32,
    pub limit: i32,
}
