//! Read-only reports. Each one that classifies loans by status runs the
//! overdue sweep for `as_of` first.

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use libris_core::AppError;
use libris_models::ids::BookId;

use super::model::{
    ActiveLoansReport, BookHistoryReport, DashboardSummary, OverdueReaderRow,
    OverdueReadersReport,
};
use crate::modules::books::service::BookService;
use crate::modules::loans::service::LoanService;

pub struct ReportService;

impl ReportService {
    #[instrument(skip(db))]
    pub async fn dashboard(db: &PgPool, as_of: NaiveDate) -> Result<DashboardSummary, AppError> {
        LoanService::refresh_overdue(db, as_of).await?;

        let summary = sqlx::query_as::<_, DashboardSummary>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM books) AS total_books,
                (SELECT COUNT(*) FROM readers) AS total_readers,
                (SELECT COUNT(*) FROM employees) AS total_employees,
                (SELECT COUNT(*) FROM loans WHERE status IN ('open', 'overdue')) AS active_loans,
                (SELECT COUNT(*) FROM loans WHERE status = 'overdue') AS overdue_loans,
                (SELECT COUNT(*) FROM books WHERE availability_status = 'available') AS available_books,
                (SELECT COUNT(*) FROM books WHERE availability_status = 'loaned') AS loaned_books
            "#,
        )
        .fetch_one(db)
        .await?;

        Ok(summary)
    }

    /// Books currently out, soonest due first.
    #[instrument(skip(db))]
    pub async fn active_loans(db: &PgPool, as_of: NaiveDate) -> Result<ActiveLoansReport, AppError> {
        LoanService::refresh_overdue(db, as_of).await?;

        let data = LoanService::find_active(db).await?;

        Ok(ActiveLoansReport {
            as_of,
            total: data.len(),
            data,
        })
    }

    #[instrument(skip(db))]
    pub async fn overdue_readers(
        db: &PgPool,
        as_of: NaiveDate,
    ) -> Result<OverdueReadersReport, AppError> {
        LoanService::refresh_overdue(db, as_of).await?;

        let data = sqlx::query_as::<_, OverdueReaderRow>(
            r#"
            SELECT r.id AS reader_id, r.name AS reader_name, r.email AS reader_email,
                   r.phone AS reader_phone,
                   l.id AS loan_id, b.id AS book_id, b.title AS book_title,
                   l.loan_date, l.due_date,
                   ($1::date - l.due_date) AS days_overdue
            FROM loans l
            JOIN readers r ON r.id = l.reader_id
            JOIN books b ON b.id = l.book_id
            WHERE l.status = 'overdue'
            ORDER BY r.name, r.id, l.due_date
            "#,
        )
        .bind(as_of)
        .fetch_all(db)
        .await?;

        Ok(OverdueReadersReport {
            as_of,
            total: data.len(),
            data,
        })
    }

    #[instrument(skip(db))]
    pub async fn book_history(db: &PgPool, book_id: BookId) -> Result<BookHistoryReport, AppError> {
        let book = BookService::get_book(db, book_id).await?;
        let loans = LoanService::find_by_book(db, book_id).await?;

        Ok(BookHistoryReport { book, loans })
    }
}
