use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use libris_core::AppError;
use libris_models::ids::BookId;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::today;

use super::model::{ActiveLoansReport, BookHistoryReport, DashboardSummary, OverdueReadersReport};
use super::service::ReportService;

#[utoipa::path(
    get,
    path = "/api/reports/dashboard",
    responses(
        (status = 200, description = "Collection and loan totals", body = DashboardSummary),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<DashboardSummary>, AppError> {
    let summary = ReportService::dashboard(&state.db, today()).await?;
    Ok(Json(summary))
}

/// Books currently on loan
#[utoipa::path(
    get,
    path = "/api/reports/active-loans",
    responses(
        (status = 200, description = "Open and overdue loans by due date", body = ActiveLoansReport),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn active_loans(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<ActiveLoansReport>, AppError> {
    let report = ReportService::active_loans(&state.db, today()).await?;
    Ok(Json(report))
}

/// Readers holding overdue books
#[utoipa::path(
    get,
    path = "/api/reports/overdue-readers",
    responses(
        (status = 200, description = "Overdue loans by reader", body = OverdueReadersReport),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn overdue_readers(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<OverdueReadersReport>, AppError> {
    let report = ReportService::overdue_readers(&state.db, today()).await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/reports/book-history/{book_id}",
    params(
        ("book_id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book and all its loans", body = BookHistoryReport),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn book_history(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(book_id): Path<BookId>,
) -> Result<Json<BookHistoryReport>, AppError> {
    let report = ReportService::book_history(&state.db, book_id).await?;
    Ok(Json(report))
}
