use axum::{Router, routing::get};
use tower_governor::GovernorLayer;

use libris_config::RateLimitConfig;

use crate::state::AppState;

use super::controller::search_catalog;

pub fn init_catalog_router(rate_limit: &RateLimitConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(search_catalog))
        .layer(GovernorLayer::new(rate_limit.general_governor_config()))
}
