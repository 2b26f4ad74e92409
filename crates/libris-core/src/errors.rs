//! Application errors and the library domain error taxonomy.
//!
//! Handlers and services return [`AppError`], an HTTP status paired with an
//! [`anyhow::Error`]. Rule violations of the library domain are expressed as
//! [`LibraryError`] values and wrapped with [`AppError::domain`], which picks
//! the status from the error's [`ErrorCategory`]. The original
//! [`LibraryError`] stays reachable through [`AppError::library_error`].
//!
//! ```ignore
//! use libris_core::errors::{AppError, LibraryError};
//!
//! if book_is_loaned {
//!     return Err(AppError::domain(LibraryError::BookUnavailable));
//! }
//! ```

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Coarse grouping of [`LibraryError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    Conflict,
    ReferentialProtection,
    Validation,
}

/// Rule violations of the library domain.
///
/// None of these are fatal; each one means the requested operation was
/// rejected and nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    #[error("Book not found")]
    BookNotFound,
    #[error("Reader not found")]
    ReaderNotFound,
    #[error("Employee not found")]
    EmployeeNotFound,
    #[error("Loan not found")]
    LoanNotFound,
    /// The book is already on loan, or does not exist.
    #[error("Book is not available for loan")]
    BookUnavailable,
    #[error("Loan has already been returned")]
    LoanAlreadyReturned,
    /// Books and readers with loans on record cannot be deleted.
    #[error("Record has loan history and cannot be deleted")]
    HasLoanHistory,
    #[error("A record with this {field} already exists")]
    Duplicate { field: &'static str },
    #[error("{0}")]
    InvalidDate(String),
}

impl LibraryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::BookNotFound | Self::ReaderNotFound | Self::EmployeeNotFound | Self::LoanNotFound => {
                ErrorCategory::NotFound
            }
            Self::BookUnavailable | Self::LoanAlreadyReturned => ErrorCategory::Conflict,
            Self::HasLoanHistory => ErrorCategory::ReferentialProtection,
            Self::Duplicate { .. } | Self::InvalidDate(_) => ErrorCategory::Validation,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Conflict | ErrorCategory::ReferentialProtection => StatusCode::CONFLICT,
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable machine-readable code included in error responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BookNotFound => "book_not_found",
            Self::ReaderNotFound => "reader_not_found",
            Self::EmployeeNotFound => "employee_not_found",
            Self::LoanNotFound => "loan_not_found",
            Self::BookUnavailable => "book_unavailable",
            Self::LoanAlreadyReturned => "loan_already_returned",
            Self::HasLoanHistory => "has_loan_history",
            Self::Duplicate { .. } => "duplicate",
            Self::InvalidDate(_) => "invalid_date",
        }
    }

    /// Maps the name of a violated unique constraint to a `Duplicate` error.
    ///
    /// Constraint names follow the `<table>_<column>_key` convention used by
    /// the migrations.
    pub fn from_unique_constraint(constraint: &str) -> Option<Self> {
        let field = if constraint.ends_with("isbn_key") {
            "isbn"
        } else if constraint.ends_with("national_id_key") {
            "national_id"
        } else if constraint.ends_with("email_key") {
            "email"
        } else {
            return None;
        };

        Some(Self::Duplicate { field })
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    /// Wraps a domain rule violation, choosing the status from its category.
    pub fn domain(err: LibraryError) -> Self {
        Self::new(err.status(), err)
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message.into()))
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    /// The domain error carried by this error, if any.
    pub fn library_error(&self) -> Option<&LibraryError> {
        self.error.downcast_ref::<LibraryError>()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                error.cause_chain = ?self.error,
                error.message = %self.error,
                "Unexpected error happened"
            );

            let body = Json(json!({ "error": "Internal server error" }));
            return (self.status, body).into_response();
        }

        let body = match self.library_error() {
            Some(err) => json!({ "error": err.to_string(), "code": err.code() }),
            None => json!({ "error": self.error.to_string() }),
        };

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
