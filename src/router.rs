use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::auth::init_auth_router;
use crate::modules::books::init_books_router;
use crate::modules::catalog::init_catalog_router;
use crate::modules::employees::init_employees_router;
use crate::modules::loans::init_loans_router;
use crate::modules::readers::init_readers_router;
use crate::modules::reports::init_reports_router;
use crate::state::AppState;

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Builds the full application. Everything under `/api` except login and the
/// catalog requires a bearer token, enforced by the `AuthUser` extractor in
/// each handler.
pub fn init_router(state: AppState) -> Router {
    let rate_limit = &state.rate_limit_config;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router(rate_limit))
                .nest("/books", init_books_router())
                .nest("/readers", init_readers_router())
                .nest("/employees", init_employees_router())
                .nest("/loans", init_loans_router())
                .nest("/reports", init_reports_router())
                .nest("/catalog", init_catalog_router(rate_limit)),
        )
        .with_state(state.clone())
        .route_layer(middleware::from_fn(metrics_middleware))
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(logging_middleware))
}
