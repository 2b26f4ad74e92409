use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_reader, delete_reader, get_reader_by_id, get_readers, update_reader,
};

pub fn init_readers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_readers).post(create_reader))
        .route(
            "/{id}",
            get(get_reader_by_id).put(update_reader).delete(delete_reader),
        )
}
