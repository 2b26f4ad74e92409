pub use libris_models::employees::*;
