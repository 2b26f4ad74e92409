//! Book seeding.

use chrono::{Days, NaiveDate};
use fake::Fake;
use fake::faker::lorem::en::Words;
use fake::faker::name::en::Name;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use libris_models::ids::BookId;

use super::models::{BookSeed, SEED_ISBN_PREFIX};

const GENRES: &[&str] = &[
    "Fiction",
    "Mystery",
    "Science Fiction",
    "Fantasy",
    "Biography",
    "History",
    "Poetry",
    "Science",
    "Philosophy",
    "Children",
];

/// `SEED-` plus 12 digits: 17 characters, the longest ISBN the schema allows.
pub fn seed_isbn(serial: u64) -> String {
    format!("{SEED_ISBN_PREFIX}{:012}", serial % 1_000_000_000_000)
}

fn title_case(words: &[String]) -> String {
    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn generate_books(count: usize, base: u64) -> Vec<BookSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let words: Vec<String> = Words(2..5).fake();
            let age_days: u64 = (0..80 * 365).fake();
            let publication_date = NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.checked_sub_days(Days::new(age_days)))
                .unwrap_or_default();

            BookSeed {
                title: title_case(&words),
                isbn: seed_isbn(base + idx as u64),
                author: Name().fake(),
                genre: GENRES[idx % GENRES.len()].to_string(),
                publication_date,
            }
        })
        .collect()
}

pub async fn seed_books(
    db: &PgPool,
    count: usize,
    base: u64,
) -> Result<Vec<BookId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📚 Seeding {count} books...");

    let books = generate_books(count, base);

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(books.len());
    // 5 params per book
    for chunk in books.chunks(2000) {
        ids.extend(insert_books_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!("   ✓ Inserted {} books in {:?}", ids.len(), start_time.elapsed());
    Ok(ids)
}

async fn insert_books_chunk(
    tx: &mut Transaction<'_, Postgres>,
    books: &[BookSeed],
) -> Result<Vec<BookId>, Box<dyn std::error::Error>> {
    if books.is_empty() {
        return Ok(Vec::new());
    }

    let mut query =
        String::from("INSERT INTO books (title, isbn, author, genre, publication_date) VALUES ");
    for i in 0..books.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 5;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5
        ));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, BookId>(&query);
    for book in books {
        q = q
            .bind(&book.title)
            .bind(&book.isbn)
            .bind(&book.author)
            .bind(&book.genre)
            .bind(book.publication_date);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}
