//! Platform analytics service
//!
//! Dashboard reports are built from independent aggregate reads; the
//! queries have no dependency on each other and run concurrently.

use serde::Serialize;
use sqlx::PgPool;

use crate::error::ApiResult;

/// Platform-wide dashboard report
#[derive(Debug, Serialize)]
pub struct DashboardReport {
    pub total_campaigns: i64,
    pub active_campaigns: i64,
    pub total_votes: i64,
    pub total_revenue: i64,
    pub distinct_voters: i64,
    pub pending_payments: i64,
}

/// Analytics service for admin reporting
#[derive(Clone)]
pub struct AnalyticsService {
    db_pool: PgPool,
}

impl AnalyticsService {
    /// Create new analytics service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Build the admin dashboard report, gathering all aggregates at once
    pub async fn dashboard(&self) -> ApiResult<DashboardReport> {
        let (
            total_campaigns,
            active_campaigns,
            total_votes,
            total_revenue,
            distinct_voters,
            pending_payments,
        ) = tokio::join!(
            self.count_campaigns(),
            self.count_active_campaigns(),
            self.count_successful_votes(),
            self.sum_revenue(),
            self.count_distinct_voters(),
            self.count_pending_payments(),
        );

        Ok(DashboardReport {
            total_campaigns: total_campaigns?,
            active_campaigns: active_campaigns?,
            total_votes: total_votes?,
            total_revenue: total_revenue?,
            distinct_voters: distinct_voters?,
            pending_payments: pending_payments?,
        })
    }

    async fn count_campaigns(&self) -> ApiResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM campaigns")
            .fetch_one(&self.db_pool)
            .await?;
        Ok(count)
    }

    async fn count_active_campaigns(&self) -> ApiResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM campaigns WHERE status = 'active'")
                .fetch_one(&self.db_pool)
                .await?;
        Ok(count)
    }

    async fn count_successful_votes(&self) -> ApiResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(vote_count), 0) FROM votes WHERE status = 'success'",
        )
        .fetch_one(&self.db_pool)
        .await?;
        Ok(count)
    }

    async fn sum_revenue(&self) -> ApiResult<i64> {
        // SUM over BIGINT yields NUMERIC in Postgres; cast back for i64 decode
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM votes WHERE status = 'success'",
        )
        .fetch_one(&self.db_pool)
        .await?;
        Ok(total)
    }

    async fn count_distinct_voters(&self) -> ApiResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT voter_identifier) FROM votes WHERE status = 'success'",
        )
        .fetch_one(&self.db_pool)
        .await?;
        Ok(count)
    }

    async fn count_pending_payments(&self) -> ApiResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE status = 'pending'")
                .fetch_one(&self.db_pool)
                .await?;
        Ok(count)
    }
}
