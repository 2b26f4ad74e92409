pub use libris_models::books::*;
