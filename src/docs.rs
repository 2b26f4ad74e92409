use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use libris_core::pagination::{PaginationMeta, PaginationParams};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginRequest, LoginResponse};
use crate::modules::books::model::{
    Book, BookStatus, BookTabCounts, CatalogBook, CreateBookDto, PaginatedBooksResponse,
    PaginatedCatalogResponse, UpdateBookDto,
};
use crate::modules::employees::model::{
    CreateEmployeeDto, Employee, PaginatedEmployeesResponse, UpdateEmployeeDto,
};
use crate::modules::loans::model::{
    CreateLoanDto, Loan, LoanDetails, LoanStatus, LoanTabCounts, PaginatedLoansResponse,
    RefreshOverdueDto, RefreshOverdueResponse, ReturnLoanDto,
};
use crate::modules::readers::model::{
    CreateReaderDto, PaginatedReadersResponse, Reader, UpdateReaderDto,
};
use crate::modules::reports::model::{
    ActiveLoansReport, BookHistoryReport, DashboardSummary, OverdueReaderRow,
    OverdueReadersReport,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::me,
        crate::modules::books::controller::create_book,
        crate::modules::books::controller::get_books,
        crate::modules::books::controller::get_book_by_id,
        crate::modules::books::controller::update_book,
        crate::modules::books::controller::delete_book,
        crate::modules::books::controller::get_book_loans,
        crate::modules::readers::controller::create_reader,
        crate::modules::readers::controller::get_readers,
        crate::modules::readers::controller::get_reader_by_id,
        crate::modules::readers::controller::update_reader,
        crate::modules::readers::controller::delete_reader,
        crate::modules::employees::controller::create_employee,
        crate::modules::employees::controller::get_employees,
        crate::modules::employees::controller::get_employee_by_id,
        crate::modules::employees::controller::update_employee,
        crate::modules::employees::controller::delete_employee,
        crate::modules::loans::controller::create_loan,
        crate::modules::loans::controller::get_loans,
        crate::modules::loans::controller::get_loan_by_id,
        crate::modules::loans::controller::delete_loan,
        crate::modules::loans::controller::return_loan,
        crate::modules::loans::controller::refresh_overdue,
        crate::modules::reports::controller::dashboard,
        crate::modules::reports::controller::active_loans,
        crate::modules::reports::controller::overdue_readers,
        crate::modules::reports::controller::book_history,
        crate::modules::catalog::controller::search_catalog,
    ),
    components(
        schemas(
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
            LoginRequest,
            LoginResponse,
            Book,
            BookStatus,
            BookTabCounts,
            CreateBookDto,
            UpdateBookDto,
            PaginatedBooksResponse,
            CatalogBook,
            PaginatedCatalogResponse,
            Reader,
            CreateReaderDto,
            UpdateReaderDto,
            PaginatedReadersResponse,
            Employee,
            CreateEmployeeDto,
            UpdateEmployeeDto,
            PaginatedEmployeesResponse,
            Loan,
            LoanDetails,
            LoanStatus,
            LoanTabCounts,
            CreateLoanDto,
            ReturnLoanDto,
            RefreshOverdueDto,
            RefreshOverdueResponse,
            PaginatedLoansResponse,
            DashboardSummary,
            ActiveLoansReport,
            OverdueReaderRow,
            OverdueReadersReport,
            BookHistoryReport,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Employee login"),
        (name = "Books", description = "Book collection management"),
        (name = "Readers", description = "Library members"),
        (name = "Employees", description = "Library staff"),
        (name = "Loans", description = "Lending and returning books"),
        (name = "Reports", description = "Collection and loan reports"),
        (name = "Catalog", description = "Public book search")
    ),
    info(
        title = "Libris API",
        version = "0.1.0",
        description = "Library management API: books, readers, employees and the loan lifecycle.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
