//! Vote route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn vote_routes() -> Router<AppState> {
    Router::new()
        .route("/api/campaigns/:id/votes", post(cast_vote))
        .route("/api/campaigns/:id/votes", get(list_votes))
        .route("/api/campaigns/:id/results", get(campaign_results))
}
