//! Database seeding with fake books, readers, employees and loans.
//!
//! - [`books`] - book generation and insertion
//! - [`people`] - readers and employees
//! - [`loans`] - loans over the seeded books, keeping availability in step
//! - [`models`] - seed rows and [`SeedConfig`]
//!
//! ```ignore
//! use libris_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&db, SeedConfig::default(), today).await?;
//! ```
//!
//! Generation runs in parallel on Rayon; inserts are multi-row statements in
//! one transaction per table. All seeded employees share one bcrypt hash
//! computed at cost 4.

pub mod books;
pub mod loans;
pub mod models;
pub mod people;

pub use models::SeedConfig;

use bcrypt::hash;
use chrono::NaiveDate;
use fake::Fake;
use sqlx::PgPool;
use std::time::Instant;

use models::{SEED_EMAIL_DOMAIN, SEED_ISBN_PREFIX, SEED_PASSWORD};

/// Random starting serial so repeated runs don't collide on ISBNs, emails or
/// national IDs.
fn serial_base() -> u64 {
    (0..900_000_000_000u64).fake()
}

pub async fn seed_all(
    db: &PgPool,
    config: SeedConfig,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("🌱 Starting database seeding...");
    println!("   - Books: {}", config.books);
    println!("   - Readers: {}", config.readers);
    println!("   - Employees: {}", config.employees);
    println!("   - Loans: {}", config.effective_loans());

    let password_hash = hash(SEED_PASSWORD, 4)?;
    let base = serial_base();

    let book_ids = books::seed_books(db, config.books, base).await?;
    let reader_ids = people::seed_readers(db, config.readers, base).await?;
    let employee_ids = people::seed_employees(db, config.employees, base, &password_hash).await?;
    let loan_count = loans::seed_loans(
        db,
        &book_ids,
        &reader_ids,
        &employee_ids,
        config.effective_loans(),
        today,
    )
    .await?;

    println!(
        "\n✅ Seeding complete! Created {} books, {} readers, {} employees, {} loans in {:?}",
        book_ids.len(),
        reader_ids.len(),
        employee_ids.len(),
        loan_count,
        start_time.elapsed()
    );
    println!("\n📝 Password for all seeded employees: {SEED_PASSWORD}");

    Ok(())
}

/// Removes seeded rows and any loans touching them, then re-derives the
/// availability of the books that remain.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let isbn_pattern = format!("{SEED_ISBN_PREFIX}%");
    let email_pattern = format!("%@{SEED_EMAIL_DOMAIN}");

    let mut tx = db.begin().await?;

    let loans = sqlx::query(
        r#"DELETE FROM loans
           WHERE book_id IN (SELECT id FROM books WHERE isbn LIKE $1)
              OR reader_id IN (SELECT id FROM readers WHERE email LIKE $2)"#,
    )
    .bind(&isbn_pattern)
    .bind(&email_pattern)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let books = sqlx::query("DELETE FROM books WHERE isbn LIKE $1")
        .bind(&isbn_pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let readers = sqlx::query("DELETE FROM readers WHERE email LIKE $1")
        .bind(&email_pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let employees = sqlx::query("DELETE FROM employees WHERE email LIKE $1")
        .bind(&email_pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query(
        r#"UPDATE books b SET availability_status = 'available'
           WHERE b.availability_status = 'loaned'
             AND NOT EXISTS (
                 SELECT 1 FROM loans l
                 WHERE l.book_id = b.id AND l.status IN ('open', 'overdue')
             )"#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    println!(
        "   ✓ Deleted {loans} loans, {books} books, {readers} readers, {employees} employees in {:?}",
        start_time.elapsed()
    );

    Ok(())
}
