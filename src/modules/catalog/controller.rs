use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use libris_core::AppError;
use libris_models::books::{CatalogParams, PaginatedCatalogResponse};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::books::service::BookService;
use crate::state::AppState;

/// Search the public catalog
///
/// Anonymous; matches title or author and shows whether each book is on the
/// shelf.
#[utoipa::path(
    get,
    path = "/api/catalog",
    params(CatalogParams),
    responses(
        (status = 200, description = "Matching books by title", body = PaginatedCatalogResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 429, description = "Too many requests")
    ),
    tag = "Catalog"
)]
#[instrument(skip(state))]
pub async fn search_catalog(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<PaginatedCatalogResponse>, AppError> {
    let books = BookService::search_catalog(&state.db, params).await?;
    Ok(Json(books))
}
