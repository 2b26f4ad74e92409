use sqlx::PgPool;
use tracing::{info, instrument};

use libris_core::errors::{AppError, LibraryError};
use libris_core::pagination::PaginationMeta;
use libris_core::password::hash_password;
use libris_models::ids::EmployeeId;

use super::model::{
    CreateEmployeeDto, Employee, EmployeeCredentials, EmployeeFilterParams,
    PaginatedEmployeesResponse, UpdateEmployeeDto,
};
use crate::db::{contains_pattern, map_write_error};

const EMPLOYEE_COLUMNS: &str =
    "id, name, email, phone, national_id, address, birth_date, created_at, updated_at";

pub struct EmployeeService;

impl EmployeeService {
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create_employee(
        db: &PgPool,
        dto: CreateEmployeeDto,
    ) -> Result<Employee, AppError> {
        let credential_hash = hash_password(&dto.password)?;

        let employee = sqlx::query_as::<_, Employee>(&format!(
            "INSERT INTO employees \
                (name, email, credential_hash, phone, national_id, address, birth_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(dto.email.trim().to_lowercase())
        .bind(&credential_hash)
        .bind(dto.phone.trim())
        .bind(dto.national_id.trim())
        .bind(dto.address.trim())
        .bind(dto.birth_date)
        .fetch_one(db)
        .await
        .map_err(|e| map_write_error(e, None))?;

        info!(employee_id = %employee.id, "Employee created");

        Ok(employee)
    }

    #[instrument(skip(db))]
    pub async fn get_employee(db: &PgPool, employee_id: EmployeeId) -> Result<Employee, AppError> {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(employee_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::domain(LibraryError::EmployeeNotFound))
    }

    /// Lookup for login. Emails are stored lowercased.
    #[instrument(skip(db))]
    pub async fn find_credentials_by_email(
        db: &PgPool,
        email: &str,
    ) -> Result<Option<EmployeeCredentials>, AppError> {
        let credentials = sqlx::query_as::<_, EmployeeCredentials>(
            "SELECT id, email, credential_hash FROM employees WHERE email = $1",
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(db)
        .await?;

        Ok(credentials)
    }

    #[instrument(skip(db))]
    pub async fn list_employees(
        db: &PgPool,
        params: EmployeeFilterParams,
    ) -> Result<PaginatedEmployeesResponse, AppError> {
        let pattern = params.q.as_deref().map(contains_pattern);

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM employees \
             WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(db)
        .await?;

        let data = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees \
             WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1) \
             ORDER BY name, id LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(params.pagination.limit())
        .bind(params.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedEmployeesResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
        })
    }

    /// A new password, when given, replaces the stored hash.
    #[instrument(skip(db, dto))]
    pub async fn update_employee(
        db: &PgPool,
        employee_id: EmployeeId,
        dto: UpdateEmployeeDto,
    ) -> Result<Employee, AppError> {
        let credential_hash = dto.password.as_deref().map(hash_password).transpose()?;

        let employee = sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE employees SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                credential_hash = COALESCE($4, credential_hash),
                phone = COALESCE($5, phone),
                national_id = COALESCE($6, national_id),
                address = COALESCE($7, address),
                birth_date = COALESCE($8, birth_date)
            WHERE id = $1
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(employee_id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.email.as_deref().map(|e| e.trim().to_lowercase()))
        .bind(&credential_hash)
        .bind(dto.phone.as_deref().map(str::trim))
        .bind(dto.national_id.as_deref().map(str::trim))
        .bind(dto.address.as_deref().map(str::trim))
        .bind(dto.birth_date)
        .fetch_optional(db)
        .await
        .map_err(|e| map_write_error(e, None))?
        .ok_or_else(|| AppError::domain(LibraryError::EmployeeNotFound))?;

        if credential_hash.is_some() {
            info!(%employee_id, "Employee password changed");
        }

        Ok(employee)
    }

    /// Loans registered by the employee stay, with `employee_id` cleared.
    #[instrument(skip(db))]
    pub async fn delete_employee(db: &PgPool, employee_id: EmployeeId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(employee_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::domain(LibraryError::EmployeeNotFound));
        }

        info!(%employee_id, "Employee deleted");

        Ok(())
    }
}
