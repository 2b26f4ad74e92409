use sqlx::PgPool;

use libris_config::{CorsConfig, JwtConfig, RateLimitConfig};
use libris_db::init_db_pool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
}

impl AppState {
    /// State for an existing pool with configuration read from the environment.
    pub fn from_pool(db: PgPool) -> Self {
        Self {
            db,
            jwt_config: JwtConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            rate_limit_config: RateLimitConfig::from_env(),
        }
    }
}

pub async fn init_app_state() -> Result<AppState, sqlx::Error> {
    let db = init_db_pool().await?;
    Ok(AppState::from_pool(db))
}
