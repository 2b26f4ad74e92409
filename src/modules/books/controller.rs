use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use libris_core::AppError;
use libris_models::ids::BookId;
use libris_models::loans::LoanDetails;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::loans::service::LoanService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{Book, BookFilterParams, CreateBookDto, PaginatedBooksResponse, UpdateBookDto};
use super::service::BookService;

#[utoipa::path(
    post,
    path = "/api/books",
    request_body = CreateBookDto,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input or duplicate ISBN", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_book(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateBookDto>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = BookService::create_book(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// List books in the `available` or `loaned` tab
#[utoipa::path(
    get,
    path = "/api/books",
    params(BookFilterParams),
    responses(
        (status = 200, description = "Books in the selected tab", body = PaginatedBooksResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_books(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<BookFilterParams>,
) -> Result<Json<PaginatedBooksResponse>, AppError> {
    let books = BookService::list_books(&state.db, filters).await?;
    Ok(Json(books))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_book_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<BookId>,
) -> Result<Json<Book>, AppError> {
    let book = BookService::get_book(&state.db, id).await?;
    Ok(Json(book))
}

#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    request_body = UpdateBookDto,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input or duplicate ISBN", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_book(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<BookId>,
    ValidatedJson(dto): ValidatedJson<UpdateBookDto>,
) -> Result<Json<Book>, AppError> {
    let book = BookService::update_book(&state.db, id, dto).await?;
    Ok(Json(book))
}

#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 409, description = "Book has loan history", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_book(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<BookId>,
) -> Result<StatusCode, AppError> {
    BookService::delete_book(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Every loan of a book, newest first
#[utoipa::path(
    get,
    path = "/api/books/{id}/loans",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Loans of the book", body = Vec<LoanDetails>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_book_loans(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<BookId>,
) -> Result<Json<Vec<LoanDetails>>, AppError> {
    BookService::get_book(&state.db, id).await?;
    let loans = LoanService::find_by_book(&state.db, id).await?;
    Ok(Json(loans))
}
