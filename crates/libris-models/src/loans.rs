//! Loan records and the loan lifecycle policy.
//!
//! A loan starts `open`, may be marked `overdue` once its due date has
//! passed, and ends `returned`. `returned` is terminal. While a loan is
//! `open` or `overdue` it is *active* and its book is `loaned`; a book never
//! has more than one active loan.
//!
//! ```text
//!   open ──(due_date < as_of)──▶ overdue
//!     │                            │
//!     └──────── return ───────┬────┘
//!                             ▼
//!                          returned
//! ```

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use libris_core::errors::LibraryError;
use libris_core::pagination::{PaginationMeta, PaginationParams};

use crate::books::BookStatus;
use crate::ids::{BookId, EmployeeId, LoanId, ReaderId};

/// Fixed lending period.
pub const LOAN_PERIOD_DAYS: u64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "loan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    #[default]
    Open,
    Returned,
    Overdue,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 3] = [Self::Open, Self::Overdue, Self::Returned];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Returned => "returned",
            Self::Overdue => "overdue",
        }
    }

    /// Open or overdue: the book is off the shelf.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Open | Self::Overdue)
    }

    pub fn can_return(self) -> bool {
        self.is_active()
    }

    /// Status after an overdue sweep evaluated on `as_of`.
    ///
    /// Only open loans move, and only when the due date lies strictly before
    /// `as_of`. Applying it twice gives the same result as applying it once.
    pub fn refreshed(self, due_date: NaiveDate, as_of: NaiveDate) -> Self {
        match self {
            Self::Open if due_date < as_of => Self::Overdue,
            other => other,
        }
    }
}

/// Due date for a loan taken out on `loan_date`.
pub fn due_date_for(loan_date: NaiveDate) -> Result<NaiveDate, LibraryError> {
    loan_date
        .checked_add_days(Days::new(LOAN_PERIOD_DAYS))
        .ok_or_else(|| LibraryError::InvalidDate(format!("Loan date {loan_date} is out of range")))
}

/// A return can't be dated before the loan started.
pub fn check_return_date(loan_date: NaiveDate, return_date: NaiveDate) -> Result<(), LibraryError> {
    if return_date < loan_date {
        return Err(LibraryError::InvalidDate(format!(
            "Return date {return_date} is before loan date {loan_date}"
        )));
    }
    Ok(())
}

/// Availability a book must have given whether it has an active loan.
pub fn book_status_for(has_active_loan: bool) -> BookStatus {
    if has_active_loan {
        BookStatus::Loaned
    } else {
        BookStatus::Available
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: LoanId,
    pub book_id: BookId,
    pub reader_id: ReaderId,
    /// Null once the employee who registered the loan is deleted
    pub employee_id: Option<EmployeeId>,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A loan joined with the names needed to display it.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LoanDetails {
    pub id: LoanId,
    pub book_id: BookId,
    pub book_title: String,
    pub book_isbn: String,
    pub reader_id: ReaderId,
    pub reader_name: String,
    pub employee_id: Option<EmployeeId>,
    pub employee_name: Option<String>,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The registering employee is the authenticated caller, never a body field.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLoanDto {
    pub book_id: BookId,
    pub reader_id: ReaderId,
    /// Defaults to today
    pub loan_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ReturnLoanDto {
    /// Defaults to today
    pub return_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct RefreshOverdueDto {
    /// Defaults to today
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshOverdueResponse {
    pub as_of: NaiveDate,
    /// Loans moved from open to overdue
    pub updated: u64,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoanFilterParams {
    /// `open` (default), `overdue` or `returned`
    pub tab: Option<LoanStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl LoanFilterParams {
    pub fn tab(&self) -> LoanStatus {
        self.tab.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanTabCounts {
    pub open: i64,
    pub overdue: i64,
    pub returned: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedLoansResponse {
    pub data: Vec<LoanDetails>,
    pub meta: PaginationMeta,
    pub counts: LoanTabCounts,
}
