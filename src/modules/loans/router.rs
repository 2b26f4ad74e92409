use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_loan, delete_loan, get_loan_by_id, get_loans, refresh_overdue, return_loan,
};

pub fn init_loans_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_loan).get(get_loans))
        .route("/refresh-overdue", post(refresh_overdue))
        .route("/{id}", get(get_loan_by_id).delete(delete_loan))
        .route("/{id}/return", post(return_loan))
}
