//! Campaign service layer - campaign, category, and nominee management
//!
//! Destructive operations are guarded by vote protection: an entity with
//! successful votes can only be evicted (soft-hidden), never deleted.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::campaign::model::{
    CreateCampaignRequest, CreateCategoryRequest, CreateNomineeRequest, ListCampaignsQuery,
    UpdateCampaignRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthenticatedUser;
use crate::models::{Campaign, CampaignStatus, Category, Nominee, ResetFrequency};
use crate::period::PeriodService;

/// Build a URL slug from a campaign title plus a short random suffix to
/// keep slugs unique without a retry loop.
fn slugify(title: &str) -> String {
    let base: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect();

    format!("{}-{}", base, suffix)
}

/// Campaign service for campaign lifecycle and nominee/category management
#[derive(Clone)]
pub struct CampaignService {
    db_pool: PgPool,
    period_service: PeriodService,
}

impl CampaignService {
    /// Create new campaign service instance
    pub fn new(db_pool: PgPool, period_service: PeriodService) -> Self {
        Self {
            db_pool,
            period_service,
        }
    }

    /// Create a campaign in draft state. No voting period exists until the
    /// campaign is activated.
    pub async fn create_campaign(
        &self,
        organizer_id: Uuid,
        request: &CreateCampaignRequest,
    ) -> ApiResult<Campaign> {
        if request.reset_frequency == ResetFrequency::Custom && request.custom_reset_days.is_none()
        {
            return Err(ApiError::BadRequest(
                "custom_reset_days is required for a custom reset frequency".to_string(),
            ));
        }

        let now = Utc::now();
        let campaign = sqlx::query_as::<_, Campaign>(
            r#"
            INSERT INTO campaigns (
                id, organizer_id, title, slug, description, status, is_private,
                amount_per_vote, reset_frequency, custom_reset_days,
                auto_reset_enabled, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, 'draft', $6, $7, $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(organizer_id)
        .bind(&request.title)
        .bind(slugify(&request.title))
        .bind(&request.description)
        .bind(request.is_private)
        .bind(request.amount_per_vote)
        .bind(request.reset_frequency)
        .bind(request.custom_reset_days)
        .bind(request.auto_reset_enabled)
        .bind(now)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(campaign_id = %campaign.id, organizer_id = %organizer_id, "Campaign created");

        Ok(campaign)
    }

    /// Get a single campaign by ID
    pub async fn get_campaign(&self, id: Uuid) -> ApiResult<Option<Campaign>> {
        let campaign = sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(campaign)
    }

    /// Get a campaign by its public slug
    pub async fn get_campaign_by_slug(&self, slug: &str) -> ApiResult<Option<Campaign>> {
        let campaign = sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(campaign)
    }

    /// Fetch a campaign and require the caller to be its organizer (or an
    /// admin). The standard guard in front of every mutating operation.
    pub async fn get_owned_campaign(
        &self,
        id: Uuid,
        user: &AuthenticatedUser,
    ) -> ApiResult<Campaign> {
        let campaign = self
            .get_campaign(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

        if !user.can_act_on(campaign.organizer_id) {
            return Err(ApiError::Forbidden(
                "Only the campaign organizer may perform this action".to_string(),
            ));
        }

        Ok(campaign)
    }

    /// List campaigns with filtering and pagination. Private campaigns are
    /// excluded unless `include_private` is set (owner/admin listings).
    pub async fn list_campaigns(
        &self,
        query: &ListCampaignsQuery,
        include_private: bool,
    ) -> ApiResult<Vec<Campaign>> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * limit;

        let mut query_builder: sqlx::QueryBuilder<sqlx::Postgres> =
            sqlx::QueryBuilder::new("SELECT * FROM campaigns WHERE 1=1");

        if !include_private {
            query_builder.push(" AND is_private = FALSE");
        }
        if let Some(status) = query.status {
            query_builder.push(" AND status = ");
            query_builder.push_bind(status);
        }
        if let Some(organizer_id) = query.organizer_id {
            query_builder.push(" AND organizer_id = ");
            query_builder.push_bind(organizer_id);
        }

        query_builder.push(" ORDER BY created_at DESC LIMIT ");
        query_builder.push_bind(limit as i64);
        query_builder.push(" OFFSET ");
        query_builder.push_bind(offset as i64);

        let campaigns = query_builder
            .build_query_as::<Campaign>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(campaigns)
    }

    /// Update campaign attributes. Turning a campaign private is refused
    /// once it has successful votes.
    pub async fn update_campaign(
        &self,
        campaign: &Campaign,
        request: &UpdateCampaignRequest,
    ) -> ApiResult<Campaign> {
        if request.is_private == Some(true) && !campaign.is_private {
            let has_votes = self.campaign_has_successful_votes(campaign.id).await?;
            if has_votes {
                return Err(ApiError::Conflict(
                    "Campaign has recorded votes and can no longer be made private".to_string(),
                ));
            }
        }

        let updated = sqlx::query_as::<_, Campaign>(
            r#"
            UPDATE campaigns
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                amount_per_vote = COALESCE($4, amount_per_vote),
                is_private = COALESCE($5, is_private),
                updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(campaign.id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.amount_per_vote)
        .bind(request.is_private)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        Ok(updated)
    }

    /// Activate a draft campaign, opening its first voting period
    pub async fn activate_campaign(&self, campaign: &Campaign) -> ApiResult<Campaign> {
        if campaign.status != CampaignStatus::Draft {
            return Err(ApiError::Conflict(
                "Only draft campaigns can be activated".to_string(),
            ));
        }

        sqlx::query("UPDATE campaigns SET status = 'active', updated_at = $2 WHERE id = $1")
            .bind(campaign.id)
            .bind(Utc::now())
            .execute(&self.db_pool)
            .await?;

        self.period_service.open_initial_period(campaign).await?;

        let activated = self
            .get_campaign(campaign.id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

        Ok(activated)
    }

    /// Delete a campaign. Refused once any successful vote references it.
    pub async fn delete_campaign(&self, campaign: &Campaign) -> ApiResult<()> {
        let has_votes = self.campaign_has_successful_votes(campaign.id).await?;
        if has_votes {
            return Err(ApiError::Conflict(
                "Campaign has recorded votes and cannot be deleted; end it instead".to_string(),
            ));
        }

        sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(campaign.id)
            .execute(&self.db_pool)
            .await?;

        tracing::info!(campaign_id = %campaign.id, "Campaign deleted");

        Ok(())
    }

    // ===== Vote protection checks =====

    /// Whether any successful vote references the campaign
    pub async fn campaign_has_successful_votes(&self, campaign_id: Uuid) -> ApiResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM votes WHERE campaign_id = $1 AND status = 'success'",
        )
        .bind(campaign_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(count > 0)
    }

    /// Whether any successful vote references the nominee
    pub async fn nominee_has_successful_votes(&self, nominee_id: Uuid) -> ApiResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM votes WHERE nominee_id = $1 AND status = 'success'",
        )
        .bind(nominee_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(count > 0)
    }

    /// Whether any successful vote references a nominee in the category
    pub async fn category_has_successful_votes(&self, category_id: Uuid) -> ApiResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM votes v
            JOIN nominees n ON n.id = v.nominee_id
            WHERE n.category_id = $1 AND v.status = 'success'
            "#,
        )
        .bind(category_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(count > 0)
    }

    // ===== Categories =====

    /// Create a category within a campaign
    pub async fn create_category(
        &self,
        campaign_id: Uuid,
        request: &CreateCategoryRequest,
    ) -> ApiResult<Category> {
        let now = Utc::now();
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, campaign_id, name, evicted, created_at, updated_at)
            VALUES ($1, $2, $3, FALSE, $4, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(campaign_id)
        .bind(&request.name)
        .bind(now)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(category)
    }

    /// List a campaign's categories; public listings exclude evicted ones
    pub async fn list_categories(
        &self,
        campaign_id: Uuid,
        include_evicted: bool,
    ) -> ApiResult<Vec<Category>> {
        let sql = if include_evicted {
            "SELECT * FROM categories WHERE campaign_id = $1 ORDER BY created_at"
        } else {
            "SELECT * FROM categories WHERE campaign_id = $1 AND evicted = FALSE ORDER BY created_at"
        };

        let categories = sqlx::query_as::<_, Category>(sql)
            .bind(campaign_id)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(categories)
    }

    /// Delete a category. Refused once any nominee in it has successful votes.
    pub async fn delete_category(&self, campaign_id: Uuid, category_id: Uuid) -> ApiResult<()> {
        let category = self.require_category(campaign_id, category_id).await?;

        let has_votes = self.category_has_successful_votes(category.id).await?;
        if has_votes {
            return Err(ApiError::Conflict(
                "Category has recorded votes and cannot be deleted; evict it instead".to_string(),
            ));
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category.id)
            .execute(&self.db_pool)
            .await?;

        Ok(())
    }

    /// Soft-hide a category from public view, preserving vote history
    pub async fn evict_category(&self, campaign_id: Uuid, category_id: Uuid) -> ApiResult<Category> {
        self.require_category(campaign_id, category_id).await?;

        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET evicted = TRUE, updated_at = $2 WHERE id = $1 RETURNING *",
        )
        .bind(category_id)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        Ok(category)
    }

    async fn require_category(&self, campaign_id: Uuid, category_id: Uuid) -> ApiResult<Category> {
        sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE id = $1 AND campaign_id = $2",
        )
        .bind(category_id)
        .bind(campaign_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))
    }

    // ===== Nominees =====

    /// Create a nominee within a campaign
    pub async fn create_nominee(
        &self,
        campaign_id: Uuid,
        request: &CreateNomineeRequest,
    ) -> ApiResult<Nominee> {
        if let Some(category_id) = request.category_id {
            self.require_category(campaign_id, category_id).await?;
        }

        let now = Utc::now();
        let nominee = sqlx::query_as::<_, Nominee>(
            r#"
            INSERT INTO nominees (
                id, campaign_id, category_id, name, code, evicted, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, FALSE, $6, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(campaign_id)
        .bind(request.category_id)
        .bind(&request.name)
        .bind(request.code.to_uppercase())
        .bind(now)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(nominee)
    }

    /// List a campaign's nominees; public listings exclude evicted ones
    pub async fn list_nominees(
        &self,
        campaign_id: Uuid,
        include_evicted: bool,
    ) -> ApiResult<Vec<Nominee>> {
        let sql = if include_evicted {
            "SELECT * FROM nominees WHERE campaign_id = $1 ORDER BY created_at"
        } else {
            "SELECT * FROM nominees WHERE campaign_id = $1 AND evicted = FALSE ORDER BY created_at"
        };

        let nominees = sqlx::query_as::<_, Nominee>(sql)
            .bind(campaign_id)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(nominees)
    }

    /// Delete a nominee. Refused once any successful vote references it.
    pub async fn delete_nominee(&self, campaign_id: Uuid, nominee_id: Uuid) -> ApiResult<()> {
        let nominee = self.require_nominee(campaign_id, nominee_id).await?;

        let has_votes = self.nominee_has_successful_votes(nominee.id).await?;
        if has_votes {
            return Err(ApiError::Conflict(
                "Nominee has recorded votes and cannot be deleted; evict it instead".to_string(),
            ));
        }

        sqlx::query("DELETE FROM nominees WHERE id = $1")
            .bind(nominee.id)
            .execute(&self.db_pool)
            .await?;

        Ok(())
    }

    /// Soft-hide a nominee from public view, preserving vote history
    pub async fn evict_nominee(&self, campaign_id: Uuid, nominee_id: Uuid) -> ApiResult<Nominee> {
        self.require_nominee(campaign_id, nominee_id).await?;

        let nominee = sqlx::query_as::<_, Nominee>(
            "UPDATE nominees SET evicted = TRUE, updated_at = $2 WHERE id = $1 RETURNING *",
        )
        .bind(nominee_id)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        Ok(nominee)
    }

    async fn require_nominee(&self, campaign_id: Uuid, nominee_id: Uuid) -> ApiResult<Nominee> {
        sqlx::query_as::<_, Nominee>("SELECT * FROM nominees WHERE id = $1 AND campaign_id = $2")
            .bind(nominee_id)
            .bind(campaign_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Nominee not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        let slug = slugify("Miss Campus 2025");
        assert!(slug.starts_with("miss-campus-2025-"));
        // 6-char random suffix
        assert_eq!(slug.len(), "miss-campus-2025-".len() + 6);
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        let slug = slugify("Ghana's Best: Vol. 2!");
        assert!(slug.starts_with("ghana-s-best-vol-2-"));
        assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }

    #[test]
    fn test_slugify_unique_suffixes() {
        let a = slugify("Same Title");
        let b = slugify("Same Title");
        assert_ne!(a, b);
    }
}
