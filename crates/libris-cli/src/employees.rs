//! Employee creation from the command line. This is how the first account
//! gets into an empty database.

use chrono::NaiveDate;
use sqlx::PgPool;

use libris_core::password::{MIN_PASSWORD_LENGTH, hash_password};
use libris_models::ids::EmployeeId;

pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub national_id: String,
    pub address: String,
    pub birth_date: NaiveDate,
}

pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a date in YYYY-MM-DD format", input.trim()))
}

pub async fn create_employee(
    db: &PgPool,
    employee: &NewEmployee,
) -> Result<EmployeeId, Box<dyn std::error::Error>> {
    if employee.password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!("Password must be at least {MIN_PASSWORD_LENGTH} characters").into());
    }

    let email = employee.email.trim().to_lowercase();

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM employees WHERE email = $1 OR national_id = $2)",
    )
    .bind(&email)
    .bind(employee.national_id.trim())
    .fetch_one(db)
    .await?;
    if exists {
        return Err("An employee with this email or national ID already exists".into());
    }

    let credential_hash = hash_password(&employee.password).map_err(|e| e.error.to_string())?;

    let id = sqlx::query_scalar::<_, EmployeeId>(
        r#"INSERT INTO employees
               (name, email, credential_hash, phone, national_id, address, birth_date)
           VALUES ($1, $2, $3, $4, $5, $6, $7)
           RETURNING id"#,
    )
    .bind(employee.name.trim())
    .bind(&email)
    .bind(&credential_hash)
    .bind(employee.phone.trim())
    .bind(employee.national_id.trim())
    .bind(employee.address.trim())
    .bind(employee.birth_date)
    .fetch_one(db)
    .await?;

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 1990-04-12 "),
            Ok(NaiveDate::from_ymd_opt(1990, 4, 12).unwrap())
        );
        assert!(parse_date("12/04/1990").is_err());
    }
}
