//! Voting period lifecycle service
//!
//! Owns the period transition protocol: closing the active period with its
//! final stats, opening the next one, and moving the campaign's pointers,
//! all inside a single transaction guarded by a per-campaign advisory lock.

use chrono::{DateTime, Duration, Months, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Campaign, PeriodResetLog, ResetFrequency, VotingPeriod};
use crate::period::model::{
    AutoResetSummary, CampaignResetResult, PeriodOverview, PeriodStats, PeriodVote, ResetActor,
    ResetOutcome, ResetPolicyRequest,
};
use crate::period::stats::aggregate_period_stats;

/// Compute when a period opening at `from` should end under the given
/// policy. `Manual` periods are open-ended.
///
/// Monthly uses calendar-month arithmetic with day-of-month clamping
/// (Jan 31 rolls to Feb 28/29).
pub fn next_period_end(
    frequency: ResetFrequency,
    custom_days: Option<i32>,
    from: DateTime<Utc>,
) -> ApiResult<Option<DateTime<Utc>>> {
    match frequency {
        ResetFrequency::Weekly => Ok(Some(from + Duration::days(7))),
        ResetFrequency::Monthly => from
            .checked_add_months(Months::new(1))
            .map(Some)
            .ok_or_else(|| ApiError::InternalError("Period end out of range".to_string())),
        ResetFrequency::Custom => {
            let days = custom_days.ok_or_else(|| {
                ApiError::BadRequest(
                    "custom_days is required for a custom reset frequency".to_string(),
                )
            })?;
            if !(1..=365).contains(&days) {
                return Err(ApiError::BadRequest(
                    "custom_days must be between 1 and 365".to_string(),
                ));
            }
            Ok(Some(from + Duration::days(days as i64)))
        }
        ResetFrequency::Manual => Ok(None),
    }
}

/// Derive the advisory lock key for a campaign from the leading bytes of
/// its UUID. Stable for the life of the campaign.
fn advisory_lock_key(campaign_id: Uuid) -> i64 {
    let bytes = campaign_id.as_bytes();
    i64::from_be_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}

/// Service managing voting period lifecycle
#[derive(Clone)]
pub struct PeriodService {
    db_pool: PgPool,
}

impl PeriodService {
    /// Create new period service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Get a campaign's active period, if any
    pub async fn active_period(&self, campaign_id: Uuid) -> ApiResult<Option<VotingPeriod>> {
        let period = sqlx::query_as::<_, VotingPeriod>(
            "SELECT * FROM voting_periods WHERE campaign_id = $1 AND status = 'active'",
        )
        .bind(campaign_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(period)
    }

    /// Current and historical periods plus reset logs for a campaign
    pub async fn overview(&self, campaign: &Campaign, can_reset: bool) -> ApiResult<PeriodOverview> {
        let active_period = self.active_period(campaign.id).await?;

        let history = sqlx::query_as::<_, VotingPeriod>(
            r#"
            SELECT * FROM voting_periods
            WHERE campaign_id = $1 AND status = 'completed'
            ORDER BY period_number DESC
            "#,
        )
        .bind(campaign.id)
        .fetch_all(&self.db_pool)
        .await?;

        let reset_logs = sqlx::query_as::<_, PeriodResetLog>(
            "SELECT * FROM period_reset_logs WHERE campaign_id = $1 ORDER BY created_at DESC",
        )
        .bind(campaign.id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(PeriodOverview {
            active_period,
            history,
            reset_logs,
            can_reset,
        })
    }

    /// Open period 1 for a campaign being activated (or the next number for
    /// a campaign re-activated after its periods were closed).
    ///
    /// Fails with a conflict if an active period already exists.
    pub async fn open_initial_period(&self, campaign: &Campaign) -> ApiResult<VotingPeriod> {
        let now = Utc::now();
        let period_end = next_period_end(campaign.reset_frequency, campaign.custom_reset_days, now)?;
        let next_reset = if campaign.auto_reset_enabled {
            period_end
        } else {
            None
        };

        let mut tx = self.db_pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(advisory_lock_key(campaign.id))
            .execute(&mut *tx)
            .await?;

        let existing: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM voting_periods WHERE campaign_id = $1 AND status = 'active'",
        )
        .bind(campaign.id)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_some() {
            return Err(ApiError::Conflict(
                "Campaign already has an active voting period".to_string(),
            ));
        }

        let next_number: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(period_number), 0) + 1 FROM voting_periods WHERE campaign_id = $1",
        )
        .bind(campaign.id)
        .fetch_one(&mut *tx)
        .await?;

        let period = sqlx::query_as::<_, VotingPeriod>(
            r#"
            INSERT INTO voting_periods (
                id, campaign_id, period_number, start_at, end_at, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, 'active', $4, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(campaign.id)
        .bind(next_number)
        .bind(now)
        .bind(period_end)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE campaigns
            SET current_period_start = $2, current_period_end = $3,
                next_auto_reset = $4, updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(campaign.id)
        .bind(now)
        .bind(period_end)
        .bind(next_reset)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            campaign_id = %campaign.id,
            period_number = period.period_number,
            "Opened voting period"
        );

        Ok(period)
    }

    /// Close the active period and open the next one.
    ///
    /// Steps 1-3 of the transition (close, insert, campaign pointers) commit
    /// atomically; the audit-log write afterwards is best-effort.
    pub async fn reset_period(
        &self,
        campaign: &Campaign,
        actor: ResetActor,
        notes: Option<String>,
    ) -> ApiResult<ResetOutcome> {
        let now = Utc::now();
        let period_end = next_period_end(campaign.reset_frequency, campaign.custom_reset_days, now)?;
        let next_reset = if campaign.auto_reset_enabled {
            period_end
        } else {
            None
        };

        let mut tx = self.db_pool.begin().await?;

        // Serialize transitions per campaign; two concurrent resets must not
        // both observe the same active period.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(advisory_lock_key(campaign.id))
            .execute(&mut *tx)
            .await?;

        let active = sqlx::query_as::<_, VotingPeriod>(
            "SELECT * FROM voting_periods WHERE campaign_id = $1 AND status = 'active'",
        )
        .bind(campaign.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign has no active voting period".to_string()))?;

        // Capture closing stats before anything is rewritten
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
        .bind(active.id)
        .fetch_all(&mut *tx)
        .await?;

        let stats = aggregate_period_stats(&votes);

        // Conditional close: zero rows affected means another reset won the race
        let closed = sqlx::query(
            r#"
            UPDATE voting_periods
            SET status = 'completed', end_at = $3, total_votes = $4,
                total_revenue = $5, total_voters = $6, updated_at = $3
            WHERE campaign_id = $1 AND id = $2 AND status = 'active'
            "#,
        )
        .bind(campaign.id)
        .bind(active.id)
        .bind(now)
        .bind(stats.total_votes)
        .bind(stats.total_revenue)
        .bind(stats.total_voters)
        .execute(&mut *tx)
        .await?;

        if closed.rows_affected() == 0 {
            return Err(ApiError::Conflict(
                "Another reset for this campaign is already in progress".to_string(),
            ));
        }

        let next_number: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(period_number), 0) + 1 FROM voting_periods WHERE campaign_id = $1",
        )
        .bind(campaign.id)
        .fetch_one(&mut *tx)
        .await?;

        let new_period = sqlx::query_as::<_, VotingPeriod>(
            r#"
            INSERT INTO voting_periods (
                id, campaign_id, period_number, start_at, end_at, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, 'active', $4, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(campaign.id)
        .bind(next_number)
        .bind(now)
        .bind(period_end)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE campaigns
            SET current_period_start = $2, current_period_end = $3,
                next_auto_reset = $4, updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(campaign.id)
        .bind(now)
        .bind(period_end)
        .bind(next_reset)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            campaign_id = %campaign.id,
            closed_period = active.period_number,
            new_period = new_period.period_number,
            triggered_by = %actor.as_db_value(),
            "Voting period reset"
        );

        // The transition is committed; a failed audit write must not undo it
        if let Err(e) = self
            .write_reset_log(campaign, &new_period, actor, &stats, notes)
            .await
        {
            tracing::warn!(
                campaign_id = %campaign.id,
                error = %e,
                "Failed to write period reset log"
            );
        }

        Ok(ResetOutcome {
            new_period,
            previous_stats: stats,
            next_reset,
        })
    }

    /// Scan for campaigns due an automatic reset and transition each one.
    ///
    /// Failures are isolated per campaign: one campaign failing is recorded
    /// and the scan continues with the rest.
    pub async fn run_due_resets(&self) -> ApiResult<AutoResetSummary> {
        let due = sqlx::query_as::<_, Campaign>(
            r#"
            SELECT * FROM campaigns
            WHERE auto_reset_enabled = TRUE
              AND status = 'active'
              AND next_auto_reset IS NOT NULL
              AND next_auto_reset <= NOW()
            ORDER BY next_auto_reset
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        let mut results = Vec::with_capacity(due.len());
        let mut succeeded = 0usize;

        for campaign in &due {
            match self.reset_period(campaign, ResetActor::System, None).await {
                Ok(outcome) => {
                    succeeded += 1;
                    results.push(CampaignResetResult {
                        campaign_id: campaign.id,
                        campaign_title: campaign.title.clone(),
                        success: true,
                        new_period_number: Some(outcome.new_period.period_number),
                        error: None,
                    });
                }
                Err(e) => {
                    tracing::error!(
                        campaign_id = %campaign.id,
                        error = %e,
                        "Automatic reset failed"
                    );
                    results.push(CampaignResetResult {
                        campaign_id: campaign.id,
                        campaign_title: campaign.title.clone(),
                        success: false,
                        new_period_number: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        Ok(AutoResetSummary {
            processed: due.len(),
            succeeded,
            failed: due.len() - succeeded,
            results,
        })
    }

    /// Update a campaign's recurring reset policy.
    ///
    /// Does not touch periods: triggering a reset and changing the policy
    /// are separate operations composed by the caller.
    pub async fn update_reset_policy(
        &self,
        campaign: &Campaign,
        request: &ResetPolicyRequest,
    ) -> ApiResult<Campaign> {
        let now = Utc::now();
        // Validates the type/interval combination up front
        let period_end = next_period_end(request.reset_type, request.custom_days, now)?;
        let next_reset = if request.auto_reset_enabled {
            period_end
        } else {
            None
        };

        let custom_days = match request.reset_type {
            ResetFrequency::Custom => request.custom_days,
            _ => None,
        };

        let updated = sqlx::query_as::<_, Campaign>(
            r#"
            UPDATE campaigns
            SET reset_frequency = $2, custom_reset_days = $3,
                auto_reset_enabled = $4, next_auto_reset = $5, updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(campaign.id)
        .bind(request.reset_type)
        .bind(custom_days)
        .bind(request.auto_reset_enabled)
        .bind(next_reset)
        .bind(now)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(
            campaign_id = %campaign.id,
            reset_frequency = %request.reset_type.as_str(),
            auto_reset_enabled = request.auto_reset_enabled,
            "Reset policy updated"
        );

        Ok(updated)
    }

    async fn write_reset_log(
        &self,
        campaign: &Campaign,
        new_period: &VotingPeriod,
        actor: ResetActor,
        stats: &PeriodStats,
        notes: Option<String>,
    ) -> ApiResult<()> {
        let stats_json = serde_json::to_value(stats)
            .map_err(|e| ApiError::InternalError(format!("Failed to serialize stats: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO period_reset_logs (
                id, campaign_id, period_id, reset_type, triggered_by,
                previous_stats, notes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(campaign.id)
        .bind(new_period.id)
        .bind(campaign.reset_frequency)
        .bind(actor.as_db_value())
        .bind(stats_json)
        .bind(notes)
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_weekly_period_end() {
        let from = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let end = next_period_end(ResetFrequency::Weekly, None, from)
            .unwrap()
            .unwrap();
        assert_eq!(end, from + Duration::days(7));
    }

    #[test]
    fn test_monthly_period_end_clamps_day_of_month() {
        let from = Utc.with_ymd_and_hms(2025, 1, 31, 9, 0, 0).unwrap();
        let end = next_period_end(ResetFrequency::Monthly, None, from)
            .unwrap()
            .unwrap();
        // Jan 31 + 1 month clamps to Feb 28 in a non-leap year
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 2, 28, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_monthly_period_end_plain() {
        let from = Utc.with_ymd_and_hms(2025, 4, 15, 0, 0, 0).unwrap();
        let end = next_period_end(ResetFrequency::Monthly, None, from)
            .unwrap()
            .unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 5, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_custom_period_end() {
        let from = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let end = next_period_end(ResetFrequency::Custom, Some(10), from)
            .unwrap()
            .unwrap();
        assert_eq!(end, from + Duration::days(10));
    }

    #[test]
    fn test_custom_requires_days() {
        let from = Utc::now();
        assert!(next_period_end(ResetFrequency::Custom, None, from).is_err());
        assert!(next_period_end(ResetFrequency::Custom, Some(0), from).is_err());
        assert!(next_period_end(ResetFrequency::Custom, Some(400), from).is_err());
    }

    #[test]
    fn test_manual_has_no_end() {
        let from = Utc::now();
        assert_eq!(next_period_end(ResetFrequency::Manual, None, from).unwrap(), None);
    }

    #[test]
    fn test_advisory_lock_key_is_stable() {
        let id = Uuid::new_v4();
        assert_eq!(advisory_lock_key(id), advisory_lock_key(id));

        let a = Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap();
        let b = Uuid::parse_str("10000000-0000-0000-0000-000000000001").unwrap();
        assert_ne!(advisory_lock_key(a), advisory_lock_key(b));
    }

    #[test]
    fn test_reset_actor_db_values() {
        let id = Uuid::new_v4();
        assert_eq!(ResetActor::User(id).as_db_value(), format!("user:{}", id));
        assert_eq!(ResetActor::System.as_db_value(), "system");
    }
}
