use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use libris_core::AppError;
use libris_models::ids::EmployeeId;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    CreateEmployeeDto, Employee, EmployeeFilterParams, PaginatedEmployeesResponse,
    UpdateEmployeeDto,
};
use super::service::EmployeeService;

#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployeeDto,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Invalid input or duplicate email / national ID", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_employee(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateEmployeeDto>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    let employee = EmployeeService::create_employee(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// List employees, optionally filtered by name or email
#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeFilterParams),
    responses(
        (status = 200, description = "Matching employees", body = PaginatedEmployeesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_employees(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<EmployeeFilterParams>,
) -> Result<Json<PaginatedEmployeesResponse>, AppError> {
    let employees = EmployeeService::list_employees(&state.db, filters).await?;
    Ok(Json(employees))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(
        ("id" = Uuid, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee details", body = Employee),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse)
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_employee_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<EmployeeId>,
) -> Result<Json<Employee>, AppError> {
    let employee = EmployeeService::get_employee(&state.db, id).await?;
    Ok(Json(employee))
}

#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(
        ("id" = Uuid, Path, description = "Employee ID")
    ),
    request_body = UpdateEmployeeDto,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Invalid input or duplicate email / national ID", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_employee(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<EmployeeId>,
    ValidatedJson(dto): ValidatedJson<UpdateEmployeeDto>,
) -> Result<Json<Employee>, AppError> {
    let employee = EmployeeService::update_employee(&state.db, id, dto).await?;
    Ok(Json(employee))
}

#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id" = Uuid, Path, description = "Employee ID")
    ),
    responses(
        (status = 204, description = "Employee deleted; their loans are kept"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse)
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_employee(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<EmployeeId>,
) -> Result<StatusCode, AppError> {
    EmployeeService::delete_employee(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
