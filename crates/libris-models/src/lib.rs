//! # Libris Models
//!
//! Entities, request/response DTOs and the loan lifecycle policy.
//!
//! - [`ids`]: typed UUID identifiers
//! - [`books`], [`readers`], [`employees`]: catalogue and people
//! - [`loans`]: loan records, status machine and due-date rules
//! - [`reports`]: report projections
//! - [`auth`]: login payloads

pub mod auth;
pub mod books;
pub mod employees;
pub mod ids;
pub mod loans;
pub mod readers;
pub mod reports;

pub use auth::{LoginRequest, LoginResponse};
pub use books::{
    Book, BookFilterParams, BookStatus, BookTabCounts, CatalogBook, CatalogParams, CreateBookDto,
    PaginatedBooksResponse, PaginatedCatalogResponse, UpdateBookDto,
};
pub use employees::{
    CreateEmployeeDto, Employee, EmployeeCredentials, EmployeeFilterParams,
    PaginatedEmployeesResponse, UpdateEmployeeDto,
};
pub use ids::{BookId, EmployeeId, LoanId, ReaderId};
pub use loans::{
    CreateLoanDto, LOAN_PERIOD_DAYS, Loan, LoanDetails, LoanFilterParams, LoanStatus,
    LoanTabCounts, PaginatedLoansResponse, RefreshOverdueDto, RefreshOverdueResponse,
    ReturnLoanDto,
};
pub use readers::{
    CreateReaderDto, PaginatedReadersResponse, Reader, ReaderFilterParams, UpdateReaderDto,
};
pub use reports::{
    ActiveLoansReport, BookHistoryReport, DashboardSummary, OverdueReaderRow,
    OverdueReadersReport,
};
