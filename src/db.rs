//! Query helpers shared by the services.

use libris_core::errors::{AppError, LibraryError};

/// Maps a failed write to a domain error where the database told us which
/// rule was broken: unique constraints become `Duplicate`, restricted foreign
/// keys become `on_foreign_key`. Anything else is a 500.
pub fn map_write_error(err: sqlx::Error, on_foreign_key: Option<LibraryError>) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if let Some(domain) = db_err.constraint().and_then(LibraryError::from_unique_constraint) {
                return AppError::domain(domain);
            }
        }
        if db_err.is_foreign_key_violation() {
            if let Some(domain) = on_foreign_key {
                return AppError::domain(domain);
            }
        }
    }
    AppError::database(err)
}

/// `ILIKE` pattern matching `term` anywhere, with wildcards in the term
/// taken literally.
pub fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
