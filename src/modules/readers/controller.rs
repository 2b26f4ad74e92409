use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use libris_core::AppError;
use libris_models::ids::ReaderId;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    CreateReaderDto, PaginatedReadersResponse, Reader, ReaderFilterParams, UpdateReaderDto,
};
use super::service::ReaderService;

#[utoipa::path(
    post,
    path = "/api/readers",
    request_body = CreateReaderDto,
    responses(
        (status = 201, description = "Reader created", body = Reader),
        (status = 400, description = "Invalid input or duplicate email / national ID", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Readers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_reader(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateReaderDto>,
) -> Result<(StatusCode, Json<Reader>), AppError> {
    let reader = ReaderService::create_reader(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(reader)))
}

/// List readers, optionally filtered by name or national ID
#[utoipa::path(
    get,
    path = "/api/readers",
    params(ReaderFilterParams),
    responses(
        (status = 200, description = "Matching readers", body = PaginatedReadersResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Readers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_readers(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<ReaderFilterParams>,
) -> Result<Json<PaginatedReadersResponse>, AppError> {
    let readers = ReaderService::list_readers(&state.db, filters).await?;
    Ok(Json(readers))
}

#[utoipa::path(
    get,
    path = "/api/readers/{id}",
    params(
        ("id" = Uuid, Path, description = "Reader ID")
    ),
    responses(
        (status = 200, description = "Reader details", body = Reader),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Reader not found", body = ErrorResponse)
    ),
    tag = "Readers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_reader_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<ReaderId>,
) -> Result<Json<Reader>, AppError> {
    let reader = ReaderService::get_reader(&state.db, id).await?;
    Ok(Json(reader))
}

#[utoipa::path(
    put,
    path = "/api/readers/{id}",
    params(
        ("id" = Uuid, Path, description = "Reader ID")
    ),
    request_body = UpdateReaderDto,
    responses(
        (status = 200, description = "Reader updated", body = Reader),
        (status = 400, description = "Invalid input or duplicate email / national ID", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Reader not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Readers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_reader(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<ReaderId>,
    ValidatedJson(dto): ValidatedJson<UpdateReaderDto>,
) -> Result<Json<Reader>, AppError> {
    let reader = ReaderService::update_reader(&state.db, id, dto).await?;
    Ok(Json(reader))
}

#[utoipa::path(
    delete,
    path = "/api/readers/{id}",
    params(
        ("id" = Uuid, Path, description = "Reader ID")
    ),
    responses(
        (status = 204, description = "Reader deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Reader not found", body = ErrorResponse),
        (status = 409, description = "Reader has loan history", body = ErrorResponse)
    ),
    tag = "Readers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_reader(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<ReaderId>,
) -> Result<StatusCode, AppError> {
    ReaderService::delete_reader(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
