//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::campaign::CampaignService;
use crate::config::Config;
use crate::payment::PaymentService;
use crate::period::PeriodService;
use crate::services::AnalyticsService;
use crate::vote::VoteService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: PgPool,
    pub campaign_service: CampaignService,
    pub period_service: PeriodService,
    pub vote_service: VoteService,
    pub payment_service: PaymentService,
    pub analytics_service: AnalyticsService,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        db_pool: PgPool,
        campaign_service: CampaignService,
        period_service: PeriodService,
        vote_service: VoteService,
        payment_service: PaymentService,
        analytics_service: AnalyticsService,
    ) -> Self {
        Self {
            config,
            db_pool,
            campaign_service,
            period_service,
            vote_service,
            payment_service,
            analytics_service,
        }
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for CampaignService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.campaign_service.clone()
    }
}

impl FromRef<AppState> for PeriodService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.period_service.clone()
    }
}

impl FromRef<AppState> for VoteService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.vote_service.clone()
    }
}

impl FromRef<AppState> for PaymentService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.payment_service.clone()
    }
}

impl FromRef<AppState> for AnalyticsService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.analytics_service.clone()
    }
}
