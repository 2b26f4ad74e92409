mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;

use common::{
    TEST_PASSWORD, authenticated_app, body_json, create_test_book, create_test_employee,
    create_test_reader, generate_unique_email, generate_unique_national_id, login, send,
};

fn employee_payload(email: &str) -> Value {
    json!({
        "name": "Margaret Hamilton",
        "email": email,
        "password": "apollo-1969",
        "phone": "555-0199",
        "national_id": generate_unique_national_id(),
        "address": "1 Tech Square",
        "birth_date": "1936-08-17"
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_employee_hides_credentials(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let email = generate_unique_email();

    let response = send(&app, "POST", "/api/employees", Some(&token), Some(employee_payload(&email))).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["email"], email);
    assert!(body.get("password").is_none());
    assert!(body.get("credential_hash").is_none());

    let response = login(&app, &email, "apollo-1969").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_employee_duplicate_email(pool: PgPool) {
    let (app, employee, token) = authenticated_app(&pool).await;

    let response = send(
        &app,
        "POST",
        "/api/employees",
        Some(&token),
        Some(employee_payload(&employee.email)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "duplicate");
    assert_eq!(body["error"], "A record with this email already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_employee_short_password(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let mut payload = employee_payload(&generate_unique_email());
    payload["password"] = json!("short");

    let response = send(&app, "POST", "/api/employees", Some(&token), Some(payload)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_and_get_employees(pool: PgPool) {
    let (app, employee, token) = authenticated_app(&pool).await;
    create_test_employee(&pool, "zelda@test.com", TEST_PASSWORD).await;

    let response = send(&app, "GET", "/api/employees?q=zelda", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["email"], "zelda@test.com");

    let response = send(
        &app,
        "GET",
        &format!("/api/employees/{}", employee.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["email"], employee.email);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_password_change_takes_effect_on_login(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let colleague = create_test_employee(&pool, &generate_unique_email(), TEST_PASSWORD).await;

    let response = send(
        &app,
        "PUT",
        &format!("/api/employees/{}", colleague.id),
        Some(&token),
        Some(json!({ "password": "a-brand-new-secret" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let old = login(&app, &colleague.email, TEST_PASSWORD).await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);

    let new = login(&app, &colleague.email, "a-brand-new-secret").await;
    assert_eq!(new.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_without_password_keeps_credential(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let colleague = create_test_employee(&pool, &generate_unique_email(), TEST_PASSWORD).await;

    let response = send(
        &app,
        "PUT",
        &format!("/api/employees/{}", colleague.id),
        Some(&token),
        Some(json!({ "phone": "555-0000" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["phone"], "555-0000");

    let response = login(&app, &colleague.email, TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_employee_keeps_their_loans(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let colleague = create_test_employee(&pool, &generate_unique_email(), TEST_PASSWORD).await;
    let colleague_token =
        common::get_auth_token(&app, &colleague.email, &colleague.password).await;
    let book = create_test_book(&pool, "Dune", "Frank Herbert").await;
    let reader = create_test_reader(&pool, "Paul Reader").await;

    let created = send(
        &app,
        "POST",
        "/api/loans",
        Some(&colleague_token),
        Some(json!({ "book_id": book.to_string(), "reader_id": reader.to_string() })),
    )
    .await;
    let loan_id = body_json(created).await["id"].as_str().unwrap().to_string();

    let response = send(
        &app,
        "DELETE",
        &format!("/api/employees/{}", colleague.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", &format!("/api/loans/{loan_id}"), Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["employee_id"], Value::Null);
    assert_eq!(body["employee_name"], Value::Null);
    assert_eq!(body["status"], "open");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_missing_employee(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;

    let response = send(
        &app,
        "DELETE",
        &format!("/api/employees/{}", uuid::Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
