use axum::{
    Router,
    routing::{get, post},
};
use tower_governor::GovernorLayer;

use libris_config::RateLimitConfig;

use crate::state::AppState;

use super::controller::{login, me};

/// Login is rate limited per client IP; `/me` is not.
pub fn init_auth_router(rate_limit: &RateLimitConfig) -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .layer(GovernorLayer::new(rate_limit.auth_governor_config()))
        .route("/me", get(me))
}
