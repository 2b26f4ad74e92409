mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{authenticated_app, body_json, book_status, create_test_book, create_test_reader, send};

#[sqlx::test(migrations = "./migrations")]
async fn test_create_loan_records_calling_employee(pool: PgPool) {
    let (app, employee, token) = authenticated_app(&pool).await;
    let book = create_test_book(&pool, "Dune", "Frank Herbert").await;
    let reader = create_test_reader(&pool, "Paul Reader").await;

    let response = send(
        &app,
        "POST",
        "/api/loans",
        Some(&token),
        Some(json!({
            "book_id": book.to_string(),
            "reader_id": reader.to_string(),
            "loan_date": "2024-01-01"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "open");
    assert_eq!(body["loan_date"], "2024-01-01");
    assert_eq!(body["due_date"], "2024-01-15");
    assert_eq!(body["return_date"], serde_json::Value::Null);
    assert_eq!(body["employee_id"], employee.id.to_string());
    assert_eq!(book_status(&pool, book).await, "loaned");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_loan_for_loaned_book_conflicts(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let book = create_test_book(&pool, "Dune", "Frank Herbert").await;
    let reader = create_test_reader(&pool, "Paul Reader").await;
    let payload = json!({ "book_id": book.to_string(), "reader_id": reader.to_string() });

    let first = send(&app, "POST", "/api/loans", Some(&token), Some(payload.clone())).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = send(&app, "POST", "/api/loans", Some(&token), Some(payload)).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = body_json(second).await;
    assert_eq!(body["code"], "book_unavailable");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_loan_for_unknown_reader_is_not_found(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let book = create_test_book(&pool, "Dune", "Frank Herbert").await;

    let response = send(
        &app,
        "POST",
        "/api/loans",
        Some(&token),
        Some(json!({
            "book_id": book.to_string(),
            "reader_id": uuid::Uuid::new_v4().to_string()
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "reader_not_found");
    assert_eq!(book_status(&pool, book).await, "available");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_loan_requires_authentication(pool: PgPool) {
    let app = common::setup_test_app(pool.clone());
    let book = create_test_book(&pool, "Dune", "Frank Herbert").await;
    let reader = create_test_reader(&pool, "Paul Reader").await;

    let response = send(
        &app,
        "POST",
        "/api/loans",
        None,
        Some(json!({ "book_id": book.to_string(), "reader_id": reader.to_string() })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(book_status(&pool, book).await, "available");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_loan_missing_field_is_bad_request(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let book = create_test_book(&pool, "Dune", "Frank Herbert").await;

    let response = send(
        &app,
        "POST",
        "/api/loans",
        Some(&token),
        Some(json!({ "book_id": book.to_string() })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "reader_id is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_return_loan_with_and_without_body(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let reader = create_test_reader(&pool, "Paul Reader").await;
    let dated = create_test_book(&pool, "Dated", "Author").await;
    let undated = create_test_book(&pool, "Undated", "Author").await;

    let mut loan_ids = Vec::new();
    for book in [dated, undated] {
        let response = send(
            &app,
            "POST",
            "/api/loans",
            Some(&token),
            Some(json!({
                "book_id": book.to_string(),
                "reader_id": reader.to_string(),
                "loan_date": "2024-01-01"
            })),
        )
        .await;
        let body = body_json(response).await;
        loan_ids.push(body["id"].as_str().unwrap().to_string());
    }

    let response = send(
        &app,
        "POST",
        &format!("/api/loans/{}/return", loan_ids[0]),
        Some(&token),
        Some(json!({ "return_date": "2024-01-20" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "returned");
    assert_eq!(body["return_date"], "2024-01-20");

    let response = send(
        &app,
        "POST",
        &format!("/api/loans/{}/return", loan_ids[1]),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "returned");
    assert!(body["return_date"].is_string());

    assert_eq!(book_status(&pool, dated).await, "available");
    assert_eq!(book_status(&pool, undated).await, "available");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_return_twice_conflicts(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let book = create_test_book(&pool, "Dune", "Frank Herbert").await;
    let reader = create_test_reader(&pool, "Paul Reader").await;

    let created = send(
        &app,
        "POST",
        "/api/loans",
        Some(&token),
        Some(json!({ "book_id": book.to_string(), "reader_id": reader.to_string() })),
    )
    .await;
    let loan_id = body_json(created).await["id"].as_str().unwrap().to_string();
    let uri = format!("/api/loans/{loan_id}/return");

    let first = send(&app, "POST", &uri, Some(&token), None).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = send(&app, "POST", &uri, Some(&token), None).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "loan_already_returned");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_and_delete_loan(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let book = create_test_book(&pool, "Dune", "Frank Herbert").await;
    let reader = create_test_reader(&pool, "Paul Reader").await;

    let created = send(
        &app,
        "POST",
        "/api/loans",
        Some(&token),
        Some(json!({ "book_id": book.to_string(), "reader_id": reader.to_string() })),
    )
    .await;
    let loan_id = body_json(created).await["id"].as_str().unwrap().to_string();

    let response = send(&app, "GET", &format!("/api/loans/{loan_id}"), Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["book_title"], "Dune");
    assert_eq!(body["reader_name"], "Paul Reader");
    assert_eq!(body["employee_name"], "Test Employee");

    let response = send(&app, "DELETE", &format!("/api/loans/{loan_id}"), Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(book_status(&pool, book).await, "available");

    let response = send(&app, "GET", &format!("/api/loans/{loan_id}"), Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_overdue_endpoint_reports_count(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let book = create_test_book(&pool, "Dune", "Frank Herbert").await;
    let reader = create_test_reader(&pool, "Paul Reader").await;

    send(
        &app,
        "POST",
        "/api/loans",
        Some(&token),
        Some(json!({
            "book_id": book.to_string(),
            "reader_id": reader.to_string(),
            "loan_date": "2024-01-01"
        })),
    )
    .await;

    let response = send(
        &app,
        "POST",
        "/api/loans/refresh-overdue",
        Some(&token),
        Some(json!({ "as_of": "2024-01-16" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["as_of"], "2024-01-16");
    assert_eq!(body["updated"], 1);

    let response = send(
        &app,
        "POST",
        "/api/loans/refresh-overdue",
        Some(&token),
        Some(json!({ "as_of": "2024-01-16" })),
    )
    .await;
    assert_eq!(body_json(response).await["updated"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_overdue_rejects_future_as_of(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let book = create_test_book(&pool, "Dune", "Frank Herbert").await;
    let reader = create_test_reader(&pool, "Paul Reader").await;

    let response = send(
        &app,
        "POST",
        "/api/loans",
        Some(&token),
        Some(json!({
            "book_id": book.to_string(),
            "reader_id": reader.to_string(),
            "loan_date": libris::utils::today().to_string()
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let loan_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = send(
        &app,
        "POST",
        "/api/loans/refresh-overdue",
        Some(&token),
        Some(json!({ "as_of": "2999-01-01" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "invalid_date");

    let status: String = sqlx::query_scalar("SELECT status::text FROM loans WHERE id = $1::uuid")
        .bind(&loan_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "open");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_loans_by_tab(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let reader = create_test_reader(&pool, "Paul Reader").await;
    let long_ago = create_test_book(&pool, "Long Ago", "Author").await;
    let recent = create_test_book(&pool, "Recent", "Author").await;

    // Far in the past: overdue by the time the list is read
    send(
        &app,
        "POST",
        "/api/loans",
        Some(&token),
        Some(json!({
            "book_id": long_ago.to_string(),
            "reader_id": reader.to_string(),
            "loan_date": "2020-01-01"
        })),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/loans",
        Some(&token),
        Some(json!({ "book_id": recent.to_string(), "reader_id": reader.to_string() })),
    )
    .await;

    let response = send(&app, "GET", "/api/loans", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["counts"]["open"], 1);
    assert_eq!(body["counts"]["overdue"], 1);
    assert_eq!(body["counts"]["returned"], 0);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["book_title"], "Recent");

    let response = send(&app, "GET", "/api/loans?tab=overdue", Some(&token), None).await;
    let body = body_json(response).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["book_title"], "Long Ago");
    assert_eq!(body["data"][0]["status"], "overdue");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_loans_rejects_unknown_tab(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;

    let response = send(&app, "GET", "/api/loans?tab=lost", Some(&token), None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
