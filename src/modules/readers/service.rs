use sqlx::PgPool;
use tracing::{info, instrument};

use libris_core::errors::{AppError, LibraryError};
use libris_core::pagination::PaginationMeta;
use libris_models::ids::ReaderId;

use super::model::{
    CreateReaderDto, PaginatedReadersResponse, Reader, ReaderFilterParams, UpdateReaderDto,
};
use crate::db::{contains_pattern, map_write_error};

const READER_COLUMNS: &str =
    "id, name, national_id, email, phone, address, birth_date, created_at, updated_at";

pub struct ReaderService;

impl ReaderService {
    #[instrument(skip(db))]
    pub async fn create_reader(db: &PgPool, dto: CreateReaderDto) -> Result<Reader, AppError> {
        let reader = sqlx::query_as::<_, Reader>(&format!(
            "INSERT INTO readers (name, national_id, email, phone, address, birth_date) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {READER_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(dto.national_id.trim())
        .bind(dto.email.trim().to_lowercase())
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(dto.birth_date)
        .fetch_one(db)
        .await
        .map_err(|e| map_write_error(e, None))?;

        info!(reader_id = %reader.id, "Reader registered");

        Ok(reader)
    }

    #[instrument(skip(db))]
    pub async fn get_reader(db: &PgPool, reader_id: ReaderId) -> Result<Reader, AppError> {
        sqlx::query_as::<_, Reader>(&format!(
            "SELECT {READER_COLUMNS} FROM readers WHERE id = $1"
        ))
        .bind(reader_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::domain(LibraryError::ReaderNotFound))
    }

    /// Readers by name, optionally narrowed by a name or national ID search.
    #[instrument(skip(db))]
    pub async fn list_readers(
        db: &PgPool,
        params: ReaderFilterParams,
    ) -> Result<PaginatedReadersResponse, AppError> {
        let pattern = params.q.as_deref().map(contains_pattern);

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM readers \
             WHERE ($1::text IS NULL OR name ILIKE $1 OR national_id ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(db)
        .await?;

        let data = sqlx::query_as::<_, Reader>(&format!(
            "SELECT {READER_COLUMNS} FROM readers \
             WHERE ($1::text IS NULL OR name ILIKE $1 OR national_id ILIKE $1) \
             ORDER BY name, id LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(params.pagination.limit())
        .bind(params.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedReadersResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn update_reader(
        db: &PgPool,
        reader_id: ReaderId,
        dto: UpdateReaderDto,
    ) -> Result<Reader, AppError> {
        sqlx::query_as::<_, Reader>(&format!(
            r#"
            UPDATE readers SET
                name = COALESCE($2, name),
                national_id = COALESCE($3, national_id),
                email = COALESCE($4, email),
                phone = CASE WHEN $8 THEN $5 ELSE phone END,
                address = CASE WHEN $9 THEN $6 ELSE address END,
                birth_date = CASE WHEN $10 THEN $7 ELSE birth_date END
            WHERE id = $1
            RETURNING {READER_COLUMNS}
            "#
        ))
        .bind(reader_id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.national_id.as_deref().map(str::trim))
        .bind(dto.email.as_deref().map(|e| e.trim().to_lowercase()))
        .bind(dto.phone.clone().flatten())
        .bind(dto.address.clone().flatten())
        .bind(dto.birth_date.flatten())
        .bind(dto.phone.is_some())
        .bind(dto.address.is_some())
        .bind(dto.birth_date.is_some())
        .fetch_optional(db)
        .await
        .map_err(|e| map_write_error(e, None))?
        .ok_or_else(|| AppError::domain(LibraryError::ReaderNotFound))
    }

    /// Readers who ever borrowed a book can't be deleted.
    #[instrument(skip(db))]
    pub async fn delete_reader(db: &PgPool, reader_id: ReaderId) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let exists =
            sqlx::query_scalar::<_, ReaderId>("SELECT id FROM readers WHERE id = $1 FOR UPDATE")
                .bind(reader_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(AppError::domain(LibraryError::ReaderNotFound));
        }

        let has_loans = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM loans WHERE reader_id = $1)",
        )
        .bind(reader_id)
        .fetch_one(&mut *tx)
        .await?;
        if has_loans {
            return Err(AppError::domain(LibraryError::HasLoanHistory));
        }

        sqlx::query("DELETE FROM readers WHERE id = $1")
            .bind(reader_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, Some(LibraryError::HasLoanHistory)))?;

        tx.commit().await?;

        info!(%reader_id, "Reader deleted");

        Ok(())
    }
}
