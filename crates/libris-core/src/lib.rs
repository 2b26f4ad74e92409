//! # Libris Core
//!
//! Foundational types shared by every Libris crate:
//!
//! - [`errors`]: [`AppError`] and the [`LibraryError`] domain taxonomy
//! - [`pagination`]: list query parameters and response metadata
//! - [`password`]: bcrypt hashing for employee credentials
//! - [`serde`]: query-string deserialization helpers

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::{AppError, ErrorCategory, LibraryError};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
