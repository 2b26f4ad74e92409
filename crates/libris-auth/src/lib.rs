//! # Libris Auth
//!
//! Employee access tokens: [`Claims`] and the HS256 encode/verify pair.
//!
//! ```ignore
//! use libris_auth::{create_access_token, verify_token};
//! use libris_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(employee_id, "ana@library.test", &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
