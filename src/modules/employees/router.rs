use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_employee, delete_employee, get_employee_by_id, get_employees, update_employee,
};

pub fn init_employees_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_employees).post(create_employee))
        .route(
            "/{id}",
            get(get_employee_by_id).put(update_employee).delete(delete_employee),
        )
}
