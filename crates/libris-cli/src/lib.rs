//! # Libris CLI
//!
//! Administrative commands and database seeding for development.
//!
//! ```ignore
//! use libris_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(200, 50, 5, 120);
//! seed_all(&pool, config, today).await?;
//! ```

pub mod employees;
pub mod seeder;
