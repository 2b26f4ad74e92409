//! Request extractors for authenticated routes.
//!
//! Handlers that require a logged-in employee take an [`auth::AuthUser`]
//! argument; the extractor rejects the request with 401 before the handler
//! runs when the bearer token is missing, malformed or expired.

pub mod auth;
