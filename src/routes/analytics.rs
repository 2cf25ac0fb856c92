//! Analytics route definitions

use axum::{routing::get, Router};

use crate::handlers::*;
use crate::state::AppState;

pub fn analytics_routes() -> Router<AppState> {
    Router::new().route("/api/analytics/dashboard", get(dashboard))
}
