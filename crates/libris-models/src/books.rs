//! Book catalogue models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use libris_core::pagination::{PaginationMeta, PaginationParams};
use libris_core::serde::{deserialize_nullable, deserialize_search_term};

use crate::ids::BookId;

/// Shelf state of a book. Only the loan lifecycle changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "book_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    #[default]
    Available,
    Loaned,
}

impl BookStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Loaned => "loaned",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub isbn: String,
    pub author: String,
    pub genre: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub availability_status: BookStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New books always start out available.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 10, max = 17))]
    pub isbn: String,
    #[validate(length(min = 1, max = 150))]
    pub author: String,
    #[validate(length(max = 80))]
    pub genre: Option<String>,
    pub publication_date: Option<NaiveDate>,
}

/// Only provided fields are changed. An explicit `null` clears `genre` or
/// `publication_date`.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBookDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 10, max = 17))]
    pub isbn: Option<String>,
    #[validate(length(min = 1, max = 150))]
    pub author: Option<String>,
    #[validate(length(max = 80))]
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub genre: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, format = Date, nullable)]
    pub publication_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookFilterParams {
    /// Case-insensitive match on title, author or ISBN
    #[serde(default, deserialize_with = "deserialize_search_term")]
    pub q: Option<String>,
    /// `available` (default) or `loaned`
    pub tab: Option<BookStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl BookFilterParams {
    pub fn tab(&self) -> BookStatus {
        self.tab.unwrap_or_default()
    }
}

/// Number of books matching the search in each tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookTabCounts {
    pub available: i64,
    pub loaned: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedBooksResponse {
    pub data: Vec<Book>,
    pub meta: PaginationMeta,
    pub counts: BookTabCounts,
}

/// Public view of a book for anonymous catalogue search.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CatalogBook {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub availability_status: BookStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogParams {
    /// Case-insensitive match on title or author
    #[serde(default, deserialize_with = "deserialize_search_term")]
    pub q: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCatalogResponse {
    pub data: Vec<CatalogBook>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_book() -> CreateBookDto {
        CreateBookDto {
            title: "The Left Hand of Darkness".to_string(),
            isbn: "978-0441478125".to_string(),
            author: "Ursula K. Le Guin".to_string(),
            genre: Some("Science fiction".to_string()),
            publication_date: NaiveDate::from_ymd_opt(1969, 3, 1),
        }
    }

    #[test]
    fn test_create_book_valid() {
        assert!(valid_book().validate().is_ok());
    }

    #[test]
    fn test_isbn_length_bounds() {
        let mut dto = valid_book();
        dto.isbn = "123".to_string();
        assert!(dto.validate().is_err());

        dto.isbn = "978-0-441-47812-5-X".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut dto = valid_book();
        dto.title = String::new();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_status_serialises_lowercase() {
        assert_eq!(
            serde_json::to_string(&BookStatus::Loaned).unwrap(),
            r#""loaned""#
        );
        let parsed: BookStatus = serde_json::from_str(r#""available""#).unwrap();
        assert_eq!(parsed, BookStatus::Available);
    }

    #[test]
    fn test_filter_defaults_to_available_tab() {
        assert_eq!(BookFilterParams::default().tab(), BookStatus::Available);
    }

    #[test]
    fn test_empty_update_is_valid() {
        assert!(UpdateBookDto::default().validate().is_ok());
    }
}
