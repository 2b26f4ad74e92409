#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::{Extension, Router};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use libris::router::init_router;
use libris::state::AppState;
use libris_config::{CorsConfig, JwtConfig, RateLimitConfig};
use libris_core::password::hash_password;
use libris_models::ids::{BookId, EmployeeId, ReaderId};

pub const TEST_PASSWORD: &str = "password123";
pub const CLIENT_ADDR: ([u8; 4], u16) = ([203, 0, 113, 7], 40_000);

pub struct TestEmployee {
    pub id: EmployeeId,
    pub email: String,
    pub password: String,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// 17 characters, the longest ISBN the schema accepts.
pub fn generate_unique_isbn() -> String {
    format!("978-{:013}", Uuid::new_v4().as_u128() % 10_000_000_000_000)
}

pub fn generate_unique_national_id() -> String {
    format!("{:014}", Uuid::new_v4().as_u128() % 100_000_000_000_000)
}

/// Limits high enough that ordinary tests never hit them.
pub fn relaxed_rate_limit_config() -> RateLimitConfig {
    RateLimitConfig {
        general_per_second: 1,
        general_burst_size: 1_000,
        auth_per_second: 1,
        auth_burst_size: 1_000,
    }
}

pub fn test_state(pool: PgPool, rate_limit_config: RateLimitConfig) -> AppState {
    dotenvy::dotenv().ok();
    AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config,
    }
}

/// The router as served, with every request arriving from `CLIENT_ADDR`.
///
/// The rate limiter keys on the `ConnectInfo` peer address, which
/// `oneshot` requests don't carry on their own.
pub fn app_with_state(state: AppState) -> Router {
    init_router(state).layer(Extension(ConnectInfo(SocketAddr::from(CLIENT_ADDR))))
}

pub fn setup_test_app(pool: PgPool) -> Router {
    app_with_state(test_state(pool, relaxed_rate_limit_config()))
}

pub async fn create_test_employee(pool: &PgPool, email: &str, password: &str) -> TestEmployee {
    let hashed = hash_password(password).unwrap();

    let id = sqlx::query_scalar::<_, EmployeeId>(
        r#"INSERT INTO employees
               (name, email, credential_hash, phone, national_id, address, birth_date)
           VALUES ($1, $2, $3, $4, $5, $6, $7)
           RETURNING id"#,
    )
    .bind("Test Employee")
    .bind(email)
    .bind(&hashed)
    .bind("555-0100")
    .bind(generate_unique_national_id())
    .bind("1 Library Lane")
    .bind(date(1985, 6, 15))
    .fetch_one(pool)
    .await
    .unwrap();

    TestEmployee {
        id,
        email: email.to_string(),
        password: password.to_string(),
    }
}

pub async fn create_test_book(pool: &PgPool, title: &str, author: &str) -> BookId {
    sqlx::query_scalar::<_, BookId>(
        "INSERT INTO books (title, isbn, author, genre) VALUES ($1, $2, $3, 'Fiction') RETURNING id",
    )
    .bind(title)
    .bind(generate_unique_isbn())
    .bind(author)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_reader(pool: &PgPool, name: &str) -> ReaderId {
    sqlx::query_scalar::<_, ReaderId>(
        "INSERT INTO readers (name, national_id, email) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(generate_unique_national_id())
    .bind(generate_unique_email())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn book_status(pool: &PgPool, book_id: BookId) -> String {
    sqlx::query_scalar::<_, String>("SELECT availability_status::text FROM books WHERE id = $1")
        .bind(book_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn login(app: &Router, email: &str, password: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": email, "password": password }).to_string(),
        ))
        .unwrap();

    app.clone().oneshot(request).await.unwrap()
}

pub async fn get_auth_token(app: &Router, email: &str, password: &str) -> String {
    let response = login(app, email, password).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["access_token"].as_str().unwrap().to_string()
}

/// An app plus a token for a freshly created employee.
pub async fn authenticated_app(pool: &PgPool) -> (Router, TestEmployee, String) {
    let employee = create_test_employee(pool, &generate_unique_email(), TEST_PASSWORD).await;
    let app = setup_test_app(pool.clone());
    let token = get_auth_token(&app, &employee.email, &employee.password).await;
    (app, employee, token)
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}
