//! Voting period route definitions

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn period_routes() -> Router<AppState> {
    Router::new()
        .route("/api/campaigns/:id/reset-votes", post(reset_votes))
        .route("/api/campaigns/:id/reset-votes", get(get_reset_overview))
        .route("/api/campaigns/:id/reset-policy", put(update_reset_policy))
        .route("/api/campaigns/:id/test-auto-reset", post(test_auto_reset))
}

pub fn cron_routes() -> Router<AppState> {
    Router::new().route("/api/cron/auto-reset-votes", post(auto_reset_votes))
}
