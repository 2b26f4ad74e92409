pub use libris_models::auth::*;
