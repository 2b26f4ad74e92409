pub use libris_models::loans::*;
