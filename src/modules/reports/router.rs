use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{active_loans, book_history, dashboard, overdue_readers};

pub fn init_reports_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/active-loans", get(active_loans))
        .route("/overdue-readers", get(overdue_readers))
        .route("/book-history/{book_id}", get(book_history))
}
