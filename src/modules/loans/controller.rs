use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use libris_core::{AppError, LibraryError};
use libris_models::ids::LoanId;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::today;
use crate::validator::ValidatedJson;

use super::model::{
    CreateLoanDto, Loan, LoanDetails, LoanFilterParams, PaginatedLoansResponse,
    RefreshOverdueDto, RefreshOverdueResponse, ReturnLoanDto,
};
use super::service::LoanService;

/// Lend a book to a reader
///
/// The authenticated employee is recorded as the one who registered the loan.
#[utoipa::path(
    post,
    path = "/api/loans",
    request_body = CreateLoanDto,
    responses(
        (status = 201, description = "Loan opened", body = Loan),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Reader or employee not found", body = ErrorResponse),
        (status = 409, description = "Book is not available", body = ErrorResponse)
    ),
    tag = "Loans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_loan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateLoanDto>,
) -> Result<(StatusCode, Json<Loan>), AppError> {
    let employee_id = auth_user.employee_id()?;
    let loan_date = dto.loan_date.unwrap_or_else(today);

    let loan =
        LoanService::open_loan(&state.db, dto.book_id, dto.reader_id, employee_id, loan_date)
            .await?;

    Ok((StatusCode::CREATED, Json(loan)))
}

#[utoipa::path(
    get,
    path = "/api/loans",
    params(LoanFilterParams),
    responses(
        (status = 200, description = "Loans in the selected tab", body = PaginatedLoansResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Loans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_loans(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<LoanFilterParams>,
) -> Result<Json<PaginatedLoansResponse>, AppError> {
    let loans = LoanService::list_loans(&state.db, filters, today()).await?;
    Ok(Json(loans))
}

#[utoipa::path(
    get,
    path = "/api/loans/{id}",
    params(
        ("id" = Uuid, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan details", body = LoanDetails),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Loan not found", body = ErrorResponse)
    ),
    tag = "Loans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_loan_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<LoanId>,
) -> Result<Json<LoanDetails>, AppError> {
    let loan = LoanService::get_loan(&state.db, id).await?;
    Ok(Json(loan))
}

/// Delete a loan record
///
/// The book's availability is recomputed from its remaining loans.
#[utoipa::path(
    delete,
    path = "/api/loans/{id}",
    params(
        ("id" = Uuid, Path, description = "Loan ID")
    ),
    responses(
        (status = 204, description = "Loan deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Loan not found", body = ErrorResponse)
    ),
    tag = "Loans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_loan(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<LoanId>,
) -> Result<StatusCode, AppError> {
    LoanService::delete_loan(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Return a borrowed book
///
/// The body is optional; without a `return_date` today is used.
#[utoipa::path(
    post,
    path = "/api/loans/{id}/return",
    params(
        ("id" = Uuid, Path, description = "Loan ID")
    ),
    request_body(content = ReturnLoanDto, description = "Optional return date"),
    responses(
        (status = 200, description = "Loan returned", body = Loan),
        (status = 400, description = "Return date before loan date", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Loan not found", body = ErrorResponse),
        (status = 409, description = "Loan already returned", body = ErrorResponse)
    ),
    tag = "Loans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn return_loan(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<LoanId>,
    body: Option<Json<ReturnLoanDto>>,
) -> Result<Json<Loan>, AppError> {
    let dto = body.map(|Json(dto)| dto).unwrap_or_default();
    let return_date = dto.return_date.unwrap_or_else(today);

    let loan = LoanService::return_loan(&state.db, id, return_date).await?;
    Ok(Json(loan))
}

/// Mark open loans past their due date as overdue
#[utoipa::path(
    post,
    path = "/api/loans/refresh-overdue",
    request_body(content = RefreshOverdueDto, description = "Optional reference date"),
    responses(
        (status = 200, description = "Sweep finished", body = RefreshOverdueResponse),
        (status = 400, description = "Reference date is in the future", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Loans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn refresh_overdue(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    body: Option<Json<RefreshOverdueDto>>,
) -> Result<Json<RefreshOverdueResponse>, AppError> {
    let dto = body.map(|Json(dto)| dto).unwrap_or_default();
    let now = today();
    let as_of = dto.as_of.unwrap_or(now);
    if as_of > now {
        return Err(AppError::domain(LibraryError::InvalidDate(format!(
            "as_of {as_of} is after today ({now})"
        ))));
    }

    let updated = LoanService::refresh_overdue(&state.db, as_of).await?;
    Ok(Json(RefreshOverdueResponse { as_of, updated }))
}
