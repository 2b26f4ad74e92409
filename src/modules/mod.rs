pub mod auth;
pub mod books;
pub mod catalog;
pub mod employees;
pub mod loans;
pub mod readers;
pub mod reports;
