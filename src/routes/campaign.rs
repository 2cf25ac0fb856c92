//! Campaign route definitions

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn campaign_routes() -> Router<AppState> {
    Router::new()
        .route("/api/campaigns", post(create_campaign))
        .route("/api/campaigns", get(list_campaigns))
        .route("/api/campaigns/mine", get(list_my_campaigns))
        .route("/api/campaigns/:id", get(get_campaign))
        .route("/api/campaigns/:id", put(update_campaign))
        .route("/api/campaigns/:id", delete(delete_campaign))
        .route("/api/campaigns/:id/activate", post(activate_campaign))
        .route("/api/campaigns/:id/categories", post(create_category))
        .route("/api/campaigns/:id/categories", get(list_categories))
        .route(
            "/api/campaigns/:id/categories/:category_id",
            delete(delete_category),
        )
        .route(
            "/api/campaigns/:id/categories/:category_id/evict",
            post(evict_category),
        )
        .route("/api/campaigns/:id/nominees", post(create_nominee))
        .route("/api/campaigns/:id/nominees", get(list_nominees))
        .route(
            "/api/campaigns/:id/nominees/:nominee_id",
            delete(delete_nominee),
        )
        .route(
            "/api/campaigns/:id/nominees/:nominee_id/evict",
            post(evict_nominee),
        )
}
