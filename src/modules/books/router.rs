use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_book, delete_book, get_book_by_id, get_book_loans, get_books, update_book,
};

pub fn init_books_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_books).post(create_book))
        .route(
            "/{id}",
            get(get_book_by_id).put(update_book).delete(delete_book),
        )
        .route("/{id}/loans", get(get_book_loans))
}
