use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Access token claims for an authenticated employee.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Employee id
    pub sub: String,
    pub email: String,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// The employee id carried in `sub`, if it is a well-formed UUID.
    pub fn employee_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}
