use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use libris_auth::{Claims, verify_token};
use libris_core::AppError;
use libris_models::ids::EmployeeId;

use crate::state::AppState;

/// The employee making the request, taken from the `Authorization: Bearer`
/// token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn employee_id(&self) -> Result<EmployeeId, AppError> {
        self.0
            .employee_uuid()
            .map(EmployeeId::from_uuid)
            .ok_or_else(|| AppError::unauthorized("Invalid employee ID in token"))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = verify_token(token, &state.jwt_config)?;
        Ok(AuthUser(claims))
    }
}
