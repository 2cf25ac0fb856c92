//! Vote service layer - casting votes and live standings
//!
//! A cast vote starts as a `pending` row tied to the campaign's active
//! period; only gateway verification promotes it to `success`.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Campaign, CampaignStatus, Nominee, Vote};
use crate::payment::{generate_reference, PaymentService};
use crate::period::{aggregate_period_stats, PeriodService, PeriodVote};
use crate::vote::model::{CampaignResults, CastVoteRequest, CastVoteResponse, ListVotesQuery};

/// Vote service for vote casting and queries
#[derive(Clone)]
pub struct VoteService {
    db_pool: PgPool,
    payment_service: PaymentService,
    period_service: PeriodService,
}

impl VoteService {
    /// Create new vote service instance
    pub fn new(
        db_pool: PgPool,
        payment_service: PaymentService,
        period_service: PeriodService,
    ) -> Self {
        Self {
            db_pool,
            payment_service,
            period_service,
        }
    }

    /// Cast a vote: insert pending vote and payment records, then open a
    /// gateway checkout session for the voter.
    pub async fn cast_vote(
        &self,
        campaign: &Campaign,
        request: &CastVoteRequest,
    ) -> ApiResult<CastVoteResponse> {
        if campaign.status != CampaignStatus::Active {
            return Err(ApiError::Conflict(
                "Campaign is not open for voting".to_string(),
            ));
        }

        let nominee = sqlx::query_as::<_, Nominee>(
            "SELECT * FROM nominees WHERE id = $1 AND campaign_id = $2",
        )
        .bind(request.nominee_id)
        .bind(campaign.id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Nominee not found".to_string()))?;

        if nominee.evicted {
            return Err(ApiError::Conflict(
                "Nominee has been evicted from this campaign".to_string(),
            ));
        }

        let period = self
            .period_service
            .active_period(campaign.id)
            .await?
            .ok_or_else(|| {
                ApiError::Conflict("Campaign has no active voting period".to_string())
            })?;

        let amount = campaign.amount_per_vote * request.vote_count as i64;
        let reference = generate_reference();
        let now = Utc::now();

        let mut tx = self.db_pool.begin().await?;

        let vote = sqlx::query_as::<_, Vote>(
            r#"
            INSERT INTO votes (
                id, campaign_id, nominee_id, period_id, voter_identifier,
                vote_count, amount, status, payment_reference, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(campaign.id)
        .bind(nominee.id)
        .bind(period.id)
        .bind(&request.voter_identifier)
        .bind(request.vote_count)
        .bind(amount)
        .bind(&reference)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, vote_id, reference, provider, amount, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, 'paystack', $4, 'pending', $5, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vote.id)
        .bind(&reference)
        .bind(amount)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let authorization = self
            .payment_service
            .initialize_for_vote(&vote, &request.email)
            .await?;

        tracing::info!(
            campaign_id = %campaign.id,
            nominee_id = %nominee.id,
            vote_id = %vote.id,
            vote_count = request.vote_count,
            "Vote cast, awaiting payment"
        );

        Ok(CastVoteResponse {
            vote_id: vote.id,
            reference,
            authorization_url: authorization.authorization_url,
            amount,
            status: vote.status,
        })
    }

    /// List a campaign's votes with filtering and pagination
    pub async fn list_votes(&self, campaign_id: Uuid, query: &ListVotesQuery) -> ApiResult<Vec<Vote>> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * limit;

        let mut query_builder: sqlx::QueryBuilder<sqlx::Postgres> =
            sqlx::QueryBuilder::new("SELECT * FROM votes WHERE campaign_id = ");
        query_builder.push_bind(campaign_id);

        if let Some(status) = query.status {
            query_builder.push(" AND status = ");
            query_builder.push_bind(status);
        }
        if let Some(nominee_id) = query.nominee_id {
            query_builder.push(" AND nominee_id = ");
            query_builder.push_bind(nominee_id);
        }

        query_builder.push(" ORDER BY created_at DESC LIMIT ");
        query_builder.push_bind(limit as i64);
        query_builder.push(" OFFSET ");
        query_builder.push_bind(offset as i64);

        let votes = query_builder
            .build_query_as::<Vote>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(votes)
    }

    /// Live standings for the campaign's active period
    pub async fn campaign_results(&self, campaign: &Campaign) -> ApiResult<CampaignResults> {
        let period = self
            .period_service
            .active_period(campaign.id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound("Campaign has no active voting period".to_string())
            })?;

        let votes = sqlx::query_as::<_, PeriodVote>(
            r#"
            SELECT v.nominee_id, n.name AS nominee_name, v.voter_identifier,
                   v.vote_count, v.amount
            FROM votes v
            JOIN nominees n ON n.id = v.nominee_id
            WHERE v.campaign_id = $1 AND v.period_id = $2 AND v.status = 'success'
            "#,
        )
        .bind(campaign.id)
        .bind(period.id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(CampaignResults {
            campaign_id: campaign.id,
            period_number: period.period_number,
            stats: aggregate_period_stats(&votes),
        })
    }
}
