//! Read-only report projections.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::books::Book;
use crate::ids::{BookId, LoanId, ReaderId};
use crate::loans::LoanDetails;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct DashboardSummary {
    pub total_books: i64,
    pub total_readers: i64,
    pub total_employees: i64,
    /// Open plus overdue
    pub active_loans: i64,
    pub overdue_loans: i64,
    pub available_books: i64,
    pub loaned_books: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveLoansReport {
    pub as_of: NaiveDate,
    pub total: usize,
    pub data: Vec<LoanDetails>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct OverdueReaderRow {
    pub reader_id: ReaderId,
    pub reader_name: String,
    pub reader_email: String,
    pub reader_phone: Option<String>,
    pub loan_id: LoanId,
    pub book_id: BookId,
    pub book_title: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub days_overdue: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OverdueReadersReport {
    pub as_of: NaiveDate,
    pub total: usize,
    pub data: Vec<OverdueReaderRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookHistoryReport {
    pub book: Book,
    pub loans: Vec<LoanDetails>,
}
