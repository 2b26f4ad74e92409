use sqlx::PgPool;
use tracing::{info, instrument, warn};

use libris_auth::create_access_token;
use libris_config::JwtConfig;
use libris_core::AppError;
use libris_core::password::verify_password;

use super::model::{LoginRequest, LoginResponse};
use crate::metrics;
use crate::modules::employees::service::EmployeeService;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    /// Unknown emails and wrong passwords get the same 401.
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let Some(credentials) = EmployeeService::find_credentials_by_email(db, &dto.email).await?
        else {
            warn!("Login attempt for unknown email");
            metrics::track_employee_login(false);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &credentials.credential_hash)? {
            warn!(employee_id = %credentials.id, "Login attempt with wrong password");
            metrics::track_employee_login(false);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let access_token =
            create_access_token(credentials.id.into_inner(), &credentials.email, jwt_config)?;
        let employee = EmployeeService::get_employee(db, credentials.id).await?;

        info!(employee_id = %employee.id, "Employee logged in");
        metrics::track_employee_login(true);

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
            employee,
        })
    }
}
