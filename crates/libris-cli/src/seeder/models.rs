//! Seed rows and seeding configuration.

use chrono::NaiveDate;

use libris_models::ids::{BookId, EmployeeId, ReaderId};
use libris_models::loans::LoanStatus;

/// Seeded ISBNs carry this prefix so `clear-seed` can find them.
pub const SEED_ISBN_PREFIX: &str = "SEED-";
/// Seeded readers and employees use addresses on this domain.
pub const SEED_EMAIL_DOMAIN: &str = "example.com";
/// Password of every seeded employee.
pub const SEED_PASSWORD: &str = "password123";

pub struct BookSeed {
    pub title: String,
    pub isbn: String,
    pub author: String,
    pub genre: String,
    pub publication_date: NaiveDate,
}

pub struct ReaderSeed {
    pub name: String,
    pub national_id: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub birth_date: NaiveDate,
}

pub struct EmployeeSeed {
    pub name: String,
    pub email: String,
    pub credential_hash: String,
    pub phone: String,
    pub national_id: String,
    pub address: String,
    pub birth_date: NaiveDate,
}

pub struct LoanSeed {
    pub book_id: BookId,
    pub reader_id: ReaderId,
    pub employee_id: EmployeeId,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: LoanStatus,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub books: usize,
    pub readers: usize,
    pub employees: usize,
    /// Capped at the number of books: each seeded book gets at most one loan.
    pub loans: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            books: 200,
            readers: 50,
            employees: 5,
            loans: 120,
        }
    }
}

impl SeedConfig {
    pub fn new(books: usize, readers: usize, employees: usize, loans: usize) -> Self {
        Self {
            books,
            readers,
            employees,
            loans,
        }
    }

    /// Loans that will actually be created.
    pub fn effective_loans(&self) -> usize {
        if self.readers == 0 || self.employees == 0 {
            return 0;
        }
        self.loans.min(self.books)
    }
}
