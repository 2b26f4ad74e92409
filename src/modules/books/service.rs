use sqlx::PgPool;
use tracing::{info, instrument};

use libris_core::errors::{AppError, LibraryError};
use libris_core::pagination::PaginationMeta;
use libris_models::ids::BookId;

use super::model::{
    Book, BookFilterParams, BookStatus, BookTabCounts, CatalogBook, CatalogParams, CreateBookDto,
    PaginatedBooksResponse, PaginatedCatalogResponse, UpdateBookDto,
};
use crate::db::{contains_pattern, map_write_error};

const BOOK_COLUMNS: &str = "id, title, isbn, author, genre, publication_date, \
     availability_status, created_at, updated_at";

pub struct BookService;

impl BookService {
    /// New books always start on the shelf.
    #[instrument(skip(db))]
    pub async fn create_book(db: &PgPool, dto: CreateBookDto) -> Result<Book, AppError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, isbn, author, genre, publication_date) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(dto.title.trim())
        .bind(dto.isbn.trim())
        .bind(dto.author.trim())
        .bind(&dto.genre)
        .bind(dto.publication_date)
        .fetch_one(db)
        .await
        .map_err(|e| map_write_error(e, None))?;

        info!(book_id = %book.id, isbn = %book.isbn, "Book created");

        Ok(book)
    }

    #[instrument(skip(db))]
    pub async fn get_book(db: &PgPool, book_id: BookId) -> Result<Book, AppError> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"))
            .bind(book_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::domain(LibraryError::BookNotFound))
    }

    /// Books in one availability tab, by title. `counts` reflects the search
    /// across both tabs.
    #[instrument(skip(db))]
    pub async fn list_books(
        db: &PgPool,
        params: BookFilterParams,
    ) -> Result<PaginatedBooksResponse, AppError> {
        let pattern = params.q.as_deref().map(contains_pattern);
        let tab = params.tab();

        let counts = sqlx::query_as::<_, BookTabCounts>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE availability_status = 'available') AS available,
                COUNT(*) FILTER (WHERE availability_status = 'loaned') AS loaned
            FROM books
            WHERE ($1::text IS NULL OR title ILIKE $1 OR author ILIKE $1 OR isbn ILIKE $1)
            "#,
        )
        .bind(&pattern)
        .fetch_one(db)
        .await?;

        let total = match tab {
            BookStatus::Available => counts.available,
            BookStatus::Loaned => counts.loaned,
        };

        let data = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books \
             WHERE availability_status = $1 \
               AND ($2::text IS NULL OR title ILIKE $2 OR author ILIKE $2 OR isbn ILIKE $2) \
             ORDER BY title, id LIMIT $3 OFFSET $4"
        ))
        .bind(tab)
        .bind(&pattern)
        .bind(params.pagination.limit())
        .bind(params.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedBooksResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
            counts,
        })
    }

    /// Availability is owned by the loan lifecycle and can't be edited here.
    #[instrument(skip(db))]
    pub async fn update_book(
        db: &PgPool,
        book_id: BookId,
        dto: UpdateBookDto,
    ) -> Result<Book, AppError> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                isbn = COALESCE($3, isbn),
                author = COALESCE($4, author),
                genre = CASE WHEN $7 THEN $5 ELSE genre END,
                publication_date = CASE WHEN $8 THEN $6 ELSE publication_date END
            WHERE id = $1
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(book_id)
        .bind(dto.title.as_deref().map(str::trim))
        .bind(dto.isbn.as_deref().map(str::trim))
        .bind(dto.author.as_deref().map(str::trim))
        .bind(dto.genre.clone().flatten())
        .bind(dto.publication_date.flatten())
        .bind(dto.genre.is_some())
        .bind(dto.publication_date.is_some())
        .fetch_optional(db)
        .await
        .map_err(|e| map_write_error(e, None))?
        .ok_or_else(|| AppError::domain(LibraryError::BookNotFound))
    }

    /// Books that were ever lent out keep their history and can't be deleted.
    #[instrument(skip(db))]
    pub async fn delete_book(db: &PgPool, book_id: BookId) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let exists = sqlx::query_scalar::<_, BookId>("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(AppError::domain(LibraryError::BookNotFound));
        }

        let has_loans = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM loans WHERE book_id = $1)",
        )
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;
        if has_loans {
            return Err(AppError::domain(LibraryError::HasLoanHistory));
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, Some(LibraryError::HasLoanHistory)))?;

        tx.commit().await?;

        info!(%book_id, "Book deleted");

        Ok(())
    }

    /// Public search over title and author. Exposes no ISBNs or loan data.
    #[instrument(skip(db))]
    pub async fn search_catalog(
        db: &PgPool,
        params: CatalogParams,
    ) -> Result<PaginatedCatalogResponse, AppError> {
        let pattern = params.q.as_deref().map(contains_pattern);

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM books WHERE ($1::text IS NULL OR title ILIKE $1 OR author ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(db)
        .await?;

        let data = sqlx::query_as::<_, CatalogBook>(
            r#"
            SELECT id, title, author, genre, publication_date, availability_status
            FROM books
            WHERE ($1::text IS NULL OR title ILIKE $1 OR author ILIKE $1)
            ORDER BY title, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(params.pagination.limit())
        .bind(params.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedCatalogResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
        })
    }
}
