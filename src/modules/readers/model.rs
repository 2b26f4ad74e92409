pub use libris_models::readers::*;
