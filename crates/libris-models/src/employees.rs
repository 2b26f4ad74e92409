use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use libris_core::pagination::{PaginationMeta, PaginationParams};
use libris_core::serde::deserialize_search_term;

use crate::ids::EmployeeId;

/// A staff member. The credential hash lives only in [`EmployeeCredentials`].
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub national_id: String,
    pub address: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Login lookup row. Never serialised.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeCredentials {
    pub id: EmployeeId,
    pub email: String,
    pub credential_hash: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEmployeeDto {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[validate(length(min = 1, max = 14))]
    pub national_id: String,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    pub birth_date: NaiveDate,
}

/// Only provided fields are changed; a `password` replaces the credential.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployeeDto {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 14))]
    pub national_id: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmployeeFilterParams {
    /// Case-insensitive match on name or email
    #[serde(default, deserialize_with = "deserialize_search_term")]
    pub q: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedEmployeesResponse {
    pub data: Vec<Employee>,
    pub meta: PaginationMeta,
}
