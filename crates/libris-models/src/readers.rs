use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use libris_core::pagination::{PaginationMeta, PaginationParams};
use libris_core::serde::{deserialize_nullable, deserialize_search_term};

use crate::ids::ReaderId;

/// A library patron who can borrow books.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Reader {
    pub id: ReaderId,
    pub name: String,
    pub national_id: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReaderDto {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(length(min = 1, max = 14))]
    pub national_id: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Only provided fields are changed. An explicit `null` clears `phone`,
/// `address` or `birth_date`.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateReaderDto {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 14))]
    pub national_id: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub phone: Option<Option<String>>,
    #[validate(length(max = 255))]
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, format = Date, nullable)]
    pub birth_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReaderFilterParams {
    /// Case-insensitive match on name or national id
    #[serde(default, deserialize_with = "deserialize_search_term")]
    pub q: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedReadersResponse {
    pub data: Vec<Reader>,
    pub meta: PaginationMeta,
}
