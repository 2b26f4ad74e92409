mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;

use common::{
    authenticated_app, body_json, create_test_book, create_test_reader, generate_unique_isbn, send,
};

fn book_payload(title: &str, isbn: &str) -> Value {
    json!({
        "title": title,
        "isbn": isbn,
        "author": "Octavia E. Butler",
        "genre": "Science fiction",
        "publication_date": "1993-10-01"
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_book(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let isbn = generate_unique_isbn();

    let response = send(
        &app,
        "POST",
        "/api/books",
        Some(&token),
        Some(book_payload("  Parable of the Sower ", &isbn)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Parable of the Sower");
    assert_eq!(body["isbn"], isbn);
    assert_eq!(body["availability_status"], "available");
    assert_eq!(body["publication_date"], "1993-10-01");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_book_ignores_client_status(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let mut payload = book_payload("Kindred", &generate_unique_isbn());
    payload["availability_status"] = json!("loaned");

    let response = send(&app, "POST", "/api/books", Some(&token), Some(payload)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["availability_status"], "available");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_book_duplicate_isbn(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let isbn = generate_unique_isbn();

    let first = send(&app, "POST", "/api/books", Some(&token), Some(book_payload("Kindred", &isbn))).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = send(&app, "POST", "/api/books", Some(&token), Some(book_payload("Dawn", &isbn))).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body = body_json(second).await;
    assert_eq!(body["code"], "duplicate");
    assert_eq!(body["error"], "A record with this isbn already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_book_validation(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;

    let response = send(
        &app,
        "POST",
        "/api/books",
        Some(&token),
        Some(json!({ "title": "", "isbn": "123", "author": "Someone" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_book_not_found(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;

    let response = send(
        &app,
        "GET",
        &format!("/api/books/{}", uuid::Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "book_not_found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_books_tabs_and_search(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let reader = create_test_reader(&pool, "Lauren Olamina").await;
    let dune = create_test_book(&pool, "Dune", "Frank Herbert").await;
    create_test_book(&pool, "Dune Messiah", "Frank Herbert").await;
    create_test_book(&pool, "Kindred", "Octavia E. Butler").await;

    send(
        &app,
        "POST",
        "/api/loans",
        Some(&token),
        Some(json!({ "book_id": dune.to_string(), "reader_id": reader.to_string() })),
    )
    .await;

    let response = send(&app, "GET", "/api/books", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["counts"]["available"], 2);
    assert_eq!(body["counts"]["loaned"], 1);
    assert_eq!(body["meta"]["total"], 2);
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Dune Messiah", "Kindred"]);

    let response = send(&app, "GET", "/api/books?tab=loaned", Some(&token), None).await;
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "Dune");

    let response = send(&app, "GET", "/api/books?q=herbert", Some(&token), None).await;
    let body = body_json(response).await;
    assert_eq!(body["counts"]["available"], 1);
    assert_eq!(body["counts"]["loaned"], 1);
    assert_eq!(body["data"][0]["title"], "Dune Messiah");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_books_pagination(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    for title in ["A", "B", "C", "D", "E"] {
        create_test_book(&pool, title, "Author").await;
    }

    let response = send(&app, "GET", "/api/books?limit=2&page=2", Some(&token), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["meta"]["total"], 5);
    assert_eq!(body["meta"]["limit"], 2);
    assert_eq!(body["meta"]["page"], 2);
    assert_eq!(body["meta"]["has_more"], true);
    assert_eq!(body["data"][0]["title"], "C");
    assert_eq!(body["data"][1]["title"], "D");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_book_changes_only_given_fields(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let book = create_test_book(&pool, "Dune", "Frank Herbert").await;

    let response = send(
        &app,
        "PUT",
        &format!("/api/books/{book}"),
        Some(&token),
        Some(json!({ "genre": "Science fiction" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Dune");
    assert_eq!(body["author"], "Frank Herbert");
    assert_eq!(body["genre"], "Science fiction");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_book_null_clears_optional_fields(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let book = create_test_book(&pool, "Dune", "Frank Herbert").await;
    let uri = format!("/api/books/{book}");

    send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "genre": "Science fiction", "publication_date": "1965-08-01" })),
    )
    .await;

    let response = send(&app, "PUT", &uri, Some(&token), Some(json!({ "title": "Dune" }))).await;
    let body = body_json(response).await;
    assert_eq!(body["genre"], "Science fiction");
    assert_eq!(body["publication_date"], "1965-08-01");

    let response = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "genre": null, "publication_date": null })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["genre"].is_null());
    assert!(body["publication_date"].is_null());
    assert_eq!(body["title"], "Dune");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_book_to_taken_isbn(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let isbn = generate_unique_isbn();
    send(&app, "POST", "/api/books", Some(&token), Some(book_payload("Kindred", &isbn))).await;
    let other = create_test_book(&pool, "Dawn", "Octavia E. Butler").await;

    let response = send(
        &app,
        "PUT",
        &format!("/api/books/{other}"),
        Some(&token),
        Some(json!({ "isbn": isbn })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "duplicate");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_book_without_loans(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let book = create_test_book(&pool, "Dune", "Frank Herbert").await;

    let response = send(&app, "DELETE", &format!("/api/books/{book}"), Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", &format!("/api/books/{book}"), Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_book_with_loan_history_conflicts(pool: PgPool) {
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
    send(&app, "POST", &format!("/api/loans/{loan_id}/return"), Some(&token), None).await;

    let response = send(&app, "DELETE", &format!("/api/books/{book}"), Some(&token), None).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "has_loan_history");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_book_loans_endpoint(pool: PgPool) {
    let (app, _, token) = authenticated_app(&pool).await;
    let book = create_test_book(&pool, "Dune", "Frank Herbert").await;
    let reader = create_test_reader(&pool, "Paul Reader").await;

    send(
        &app,
        "POST",
        "/api/loans",
        Some(&token),
        Some(json!({ "book_id": book.to_string(), "reader_id": reader.to_string() })),
    )
    .await;

    let response = send(&app, "GET", &format!("/api/books/{book}/loans"), Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let loans = body.as_array().unwrap();
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0]["reader_name"], "Paul Reader");

    let response = send(
        &app,
        "GET",
        &format!("/api/books/{}/loans", uuid::Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
