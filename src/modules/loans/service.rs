//! Loan lifecycle.
//!
//! Every operation runs in a single transaction so a book's availability and
//! its loans never disagree: a book is `loaned` exactly when one of its loans
//! is open or overdue.

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use libris_core::errors::{AppError, LibraryError};
use libris_core::pagination::PaginationMeta;
use libris_models::books::BookStatus;
use libris_models::ids::{BookId, EmployeeId, LoanId, ReaderId};

use super::model::{
    Loan, LoanDetails, LoanFilterParams, LoanStatus, LoanTabCounts, PaginatedLoansResponse,
    book_status_for, check_return_date, due_date_for,
};
use crate::db::map_write_error;
use crate::metrics;

pub(crate) const LOAN_COLUMNS: &str = "id, book_id, reader_id, employee_id, loan_date, due_date, \
     return_date, status, created_at, updated_at";

pub(crate) const LOAN_DETAILS_SELECT: &str = r#"
    SELECT l.id, l.book_id, b.title AS book_title, b.isbn AS book_isbn,
           l.reader_id, r.name AS reader_name,
           l.employee_id, e.name AS employee_name,
           l.loan_date, l.due_date, l.return_date, l.status, l.created_at, l.updated_at
    FROM loans l
    JOIN books b ON b.id = l.book_id
    JOIN readers r ON r.id = l.reader_id
    LEFT JOIN employees e ON e.id = l.employee_id
"#;

fn reject(err: LibraryError) -> AppError {
    warn!(code = err.code(), "Loan operation rejected: {err}");
    metrics::track_loan_rejected(err.code());
    AppError::domain(err)
}

pub struct LoanService;

impl LoanService {
    /// Lends a book to a reader on behalf of `employee_id`.
    ///
    /// The book flip is a conditional update, so when two requests race for
    /// the same book exactly one of them sees a row change and the other gets
    /// `BookUnavailable`.
    #[instrument(skip(db))]
    pub async fn open_loan(
        db: &PgPool,
        book_id: BookId,
        reader_id: ReaderId,
        employee_id: EmployeeId,
        loan_date: NaiveDate,
    ) -> Result<Loan, AppError> {
        let due_date = due_date_for(loan_date).map_err(AppError::domain)?;

        let mut tx = db.begin().await?;

        let reader = sqlx::query_scalar::<_, ReaderId>(
            "SELECT id FROM readers WHERE id = $1 FOR SHARE",
        )
        .bind(reader_id)
        .fetch_optional(&mut *tx)
        .await?;
        if reader.is_none() {
            return Err(reject(LibraryError::ReaderNotFound));
        }

        let employee = sqlx::query_scalar::<_, EmployeeId>(
            "SELECT id FROM employees WHERE id = $1 FOR SHARE",
        )
        .bind(employee_id)
        .fetch_optional(&mut *tx)
        .await?;
        if employee.is_none() {
            return Err(reject(LibraryError::EmployeeNotFound));
        }

        let flipped = sqlx::query(
            "UPDATE books SET availability_status = 'loaned' \
             WHERE id = $1 AND availability_status = 'available'",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;
        if flipped.rows_affected() == 0 {
            return Err(reject(LibraryError::BookUnavailable));
        }

        let loan = sqlx::query_as::<_, Loan>(&format!(
            "INSERT INTO loans (book_id, reader_id, employee_id, loan_date, due_date, status) \
             VALUES ($1, $2, $3, $4, $5, 'open') \
             RETURNING {LOAN_COLUMNS}"
        ))
        .bind(book_id)
        .bind(reader_id)
        .bind(employee_id)
        .bind(loan_date)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let active_loan_exists =
                matches!(&e, sqlx::Error::Database(db_err) if db_err.is_unique_violation());
            if active_loan_exists {
                reject(LibraryError::BookUnavailable)
            } else {
                map_write_error(e, None)
            }
        })?;

        tx.commit().await?;

        info!(
            loan_id = %loan.id,
            %book_id,
            %reader_id,
            %employee_id,
            %due_date,
            "Loan opened"
        );
        metrics::track_loan_opened();

        Ok(loan)
    }

    /// Closes an open or overdue loan and puts the book back on the shelf.
    ///
    /// Not idempotent: returning the same loan twice fails the second time
    /// with `LoanAlreadyReturned`.
    #[instrument(skip(db))]
    pub async fn return_loan(
        db: &PgPool,
        loan_id: LoanId,
        return_date: NaiveDate,
    ) -> Result<Loan, AppError> {
        let mut tx = db.begin().await?;

        let loan = sqlx::query_as::<_, Loan>(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans WHERE id = $1 FOR UPDATE"
        ))
        .bind(loan_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::domain(LibraryError::LoanNotFound))?;

        if !loan.status.can_return() {
            return Err(reject(LibraryError::LoanAlreadyReturned));
        }
        check_return_date(loan.loan_date, return_date).map_err(reject)?;

        let returned = sqlx::query_as::<_, Loan>(&format!(
            "UPDATE loans SET status = 'returned', return_date = $2 WHERE id = $1 \
             RETURNING {LOAN_COLUMNS}"
        ))
        .bind(loan_id)
        .bind(return_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET availability_status = 'available' WHERE id = $1")
            .bind(loan.book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let was_overdue = loan.status == LoanStatus::Overdue || return_date > loan.due_date;
        info!(
            %loan_id,
            book_id = %loan.book_id,
            %return_date,
            was_overdue,
            "Loan returned"
        );
        metrics::track_loan_returned(was_overdue);

        Ok(returned)
    }

    /// Marks open loans due before `as_of` as overdue. Returns the number of
    /// loans moved; a second run on the same date moves none.
    #[instrument(skip(db))]
    pub async fn refresh_overdue(db: &PgPool, as_of: NaiveDate) -> Result<u64, AppError> {
        let updated = libris_db::mark_overdue_loans(db, as_of)
            .await
            .map_err(AppError::database)?;

        if updated > 0 {
            info!(%as_of, updated, "Loans marked overdue");
            metrics::track_loans_marked_overdue(updated);
        }

        Ok(updated)
    }

    /// Removes a loan record and re-derives the book's availability from
    /// whatever active loans remain on it.
    #[instrument(skip(db))]
    pub async fn delete_loan(db: &PgPool, loan_id: LoanId) -> Result<BookStatus, AppError> {
        let mut tx = db.begin().await?;

        let book_id = sqlx::query_scalar::<_, BookId>(
            "SELECT book_id FROM loans WHERE id = $1 FOR UPDATE",
        )
        .bind(loan_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::domain(LibraryError::LoanNotFound))?;

        sqlx::query("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(loan_id)
            .execute(&mut *tx)
            .await?;

        let still_active = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM loans WHERE book_id = $1 AND status IN ('open', 'overdue'))",
        )
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        let status = book_status_for(still_active);
        sqlx::query(
            "UPDATE books SET availability_status = $2 \
             WHERE id = $1 AND availability_status <> $2",
        )
        .bind(book_id)
        .bind(status)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(%loan_id, %book_id, book_status = status.as_str(), "Loan deleted");

        Ok(status)
    }

    #[instrument(skip(db))]
    pub async fn get_loan(db: &PgPool, loan_id: LoanId) -> Result<LoanDetails, AppError> {
        sqlx::query_as::<_, LoanDetails>(&format!("{LOAN_DETAILS_SELECT} WHERE l.id = $1"))
            .bind(loan_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::domain(LibraryError::LoanNotFound))
    }

    #[instrument(skip(db))]
    pub async fn tab_counts(db: &PgPool) -> Result<LoanTabCounts, AppError> {
        let counts = sqlx::query_as::<_, LoanTabCounts>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'open') AS open,
                COUNT(*) FILTER (WHERE status = 'overdue') AS overdue,
                COUNT(*) FILTER (WHERE status = 'returned') AS returned
            FROM loans
            "#,
        )
        .fetch_one(db)
        .await?;

        Ok(counts)
    }

    /// Loans in one status tab, newest first. Runs the overdue sweep for
    /// `today` before classifying.
    #[instrument(skip(db))]
    pub async fn list_loans(
        db: &PgPool,
        params: LoanFilterParams,
        today: NaiveDate,
    ) -> Result<PaginatedLoansResponse, AppError> {
        Self::refresh_overdue(db, today).await?;

        let tab = params.tab();
        let counts = Self::tab_counts(db).await?;
        let total = match tab {
            LoanStatus::Open => counts.open,
            LoanStatus::Overdue => counts.overdue,
            LoanStatus::Returned => counts.returned,
        };

        let data = sqlx::query_as::<_, LoanDetails>(&format!(
            "{LOAN_DETAILS_SELECT} WHERE l.status = $1 \
             ORDER BY l.loan_date DESC, l.created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(tab)
        .bind(params.pagination.limit())
        .bind(params.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedLoansResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
            counts,
        })
    }

    /// Every loan of a book, newest first.
    #[instrument(skip(db))]
    pub async fn find_by_book(db: &PgPool, book_id: BookId) -> Result<Vec<LoanDetails>, AppError> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{LOAN_DETAILS_SELECT} WHERE l.book_id = $1 ORDER BY l.loan_date DESC, l.created_at DESC"
        ))
        .bind(book_id)
        .fetch_all(db)
        .await?;

        Ok(loans)
    }

    /// Open and overdue loans, soonest due first.
    #[instrument(skip(db))]
    pub async fn find_active(db: &PgPool) -> Result<Vec<LoanDetails>, AppError> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{LOAN_DETAILS_SELECT} WHERE l.status IN ('open', 'overdue') \
             ORDER BY l.due_date, l.loan_date"
        ))
        .fetch_all(db)
        .await?;

        Ok(loans)
    }
}
