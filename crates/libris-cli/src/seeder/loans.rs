//! Loan seeding.
//!
//! Every generated loan sits on its own book, so a book never ends up with
//! two active loans. Books whose loan is still active are flipped to
//! `loaned` in the same transaction.

use chrono::{Days, NaiveDate};
use fake::Fake;
use fake::faker::boolean::en::Boolean;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use libris_models::ids::{BookId, EmployeeId, ReaderId};
use libris_models::loans::{LOAN_PERIOD_DAYS, LoanStatus};

use super::models::LoanSeed;

/// Loans start up to this many days before `today`.
const MAX_LOAN_AGE_DAYS: u64 = 60;

pub fn generate_loans(
    book_ids: &[BookId],
    reader_ids: &[ReaderId],
    employee_ids: &[EmployeeId],
    count: usize,
    today: NaiveDate,
) -> Vec<LoanSeed> {
    if reader_ids.is_empty() || employee_ids.is_empty() {
        return Vec::new();
    }

    book_ids
        .par_iter()
        .take(count)
        .map(|&book_id| {
            let reader_id = reader_ids[(0..reader_ids.len()).fake::<usize>()];
            let employee_id = employee_ids[(0..employee_ids.len()).fake::<usize>()];
            let age: u64 = (0..=MAX_LOAN_AGE_DAYS).fake();
            let loan_date = today.checked_sub_days(Days::new(age)).unwrap_or(today);
            let due_date = loan_date
                .checked_add_days(Days::new(LOAN_PERIOD_DAYS))
                .unwrap_or(loan_date);

            let returned: bool = Boolean(40).fake();
            let return_date = if returned {
                let kept: u64 = (0..=age).fake();
                loan_date.checked_add_days(Days::new(kept))
            } else {
                None
            };

            let status = match return_date {
                Some(_) => LoanStatus::Returned,
                None => LoanStatus::Open.refreshed(due_date, today),
            };

            LoanSeed {
                book_id,
                reader_id,
                employee_id,
                loan_date,
                due_date,
                return_date,
                status,
            }
        })
        .collect()
}

pub async fn seed_loans(
    db: &PgPool,
    book_ids: &[BookId],
    reader_ids: &[ReaderId],
    employee_ids: &[EmployeeId],
    count: usize,
    today: NaiveDate,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🔖 Seeding {count} loans...");

    let loans = generate_loans(book_ids, reader_ids, employee_ids, count, today);

    let mut tx = db.begin().await?;
    // 7 params per loan
    for chunk in loans.chunks(1000) {
        insert_loans_chunk(&mut tx, chunk).await?;
    }

    let loaned: Vec<BookId> = loans
        .iter()
        .filter(|loan| loan.status.is_active())
        .map(|loan| loan.book_id)
        .collect();
    sqlx::query("UPDATE books SET availability_status = 'loaned' WHERE id = ANY($1)")
        .bind(&loaned)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} loans ({} still out) in {:?}",
        loans.len(),
        loaned.len(),
        start_time.elapsed()
    );
    Ok(loans.len())
}

async fn insert_loans_chunk(
    tx: &mut Transaction<'_, Postgres>,
    loans: &[LoanSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    if loans.is_empty() {
        return Ok(());
    }

    let mut query = String::from(
        "INSERT INTO loans \
         (book_id, reader_id, employee_id, loan_date, due_date, return_date, status) VALUES ",
    );
    for i in 0..loans.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 7;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6,
            p + 7
        ));
    }

    let mut q = sqlx::query(&query);
    for loan in loans {
        q = q
            .bind(loan.book_id)
            .bind(loan.reader_id)
            .bind(loan.employee_id)
            .bind(loan.loan_date)
            .bind(loan.due_date)
            .bind(loan.return_date)
            .bind(loan.status);
    }

    q.execute(&mut **tx).await?;
    Ok(())
}
