pub use libris_models::reports::*;
