//! Reader and employee seeding.

use chrono::{Days, NaiveDate};
use fake::Fake;
use fake::faker::address::en::{CityName, StreetName};
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use libris_models::ids::{EmployeeId, ReaderId};

use super::models::{EmployeeSeed, ReaderSeed, SEED_EMAIL_DOMAIN};

struct Person {
    name: String,
    email: String,
    phone: String,
    address: String,
    birth_date: NaiveDate,
}

fn fake_person(tag: char, serial: u64) -> Person {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let street: String = StreetName().fake();
    let city: String = CityName().fake();
    let mut phone: String = PhoneNumber().fake();
    phone.truncate(20);
    let age_days: u64 = (18 * 365..75 * 365).fake();

    let birth_date = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.checked_sub_days(Days::new(age_days)))
        .unwrap_or_default();

    Person {
        email: format!(
            "{}.{}+{}{}@{}",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            tag,
            serial,
            SEED_EMAIL_DOMAIN
        ),
        name: format!("{first_name} {last_name}"),
        phone,
        address: format!("{} {street}, {city}", (1..999).fake::<u32>()),
        birth_date,
    }
}

/// 13 digits after a one-letter tag keeps national IDs within 14 characters.
fn national_id(tag: char, serial: u64) -> String {
    format!("{tag}{:013}", serial % 10_000_000_000_000)
}

pub fn generate_readers(count: usize, base: u64) -> Vec<ReaderSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let serial = base + idx as u64;
            let person = fake_person('r', serial);
            ReaderSeed {
                name: person.name,
                national_id: national_id('R', serial),
                email: person.email,
                phone: person.phone,
                address: person.address,
                birth_date: person.birth_date,
            }
        })
        .collect()
}

pub fn generate_employees(count: usize, base: u64, credential_hash: &str) -> Vec<EmployeeSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let serial = base + idx as u64;
            let person = fake_person('e', serial);
            EmployeeSeed {
                name: person.name,
                email: person.email,
                credential_hash: credential_hash.to_string(),
                phone: person.phone,
                national_id: national_id('E', serial),
                address: person.address,
                birth_date: person.birth_date,
            }
        })
        .collect()
}

pub async fn seed_readers(
    db: &PgPool,
    count: usize,
    base: u64,
) -> Result<Vec<ReaderId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🧑 Seeding {count} readers...");

    let readers = generate_readers(count, base);

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(readers.len());
    // 6 params per reader
    for chunk in readers.chunks(1000) {
        ids.extend(insert_readers_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!("   ✓ Inserted {} readers in {:?}", ids.len(), start_time.elapsed());
    Ok(ids)
}

async fn insert_readers_chunk(
    tx: &mut Transaction<'_, Postgres>,
    readers: &[ReaderSeed],
) -> Result<Vec<ReaderId>, Box<dyn std::error::Error>> {
    if readers.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO readers (name, national_id, email, phone, address, birth_date) VALUES ",
    );
    for i in 0..readers.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 6;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6
        ));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, ReaderId>(&query);
    for reader in readers {
        q = q
            .bind(&reader.name)
            .bind(&reader.national_id)
            .bind(&reader.email)
            .bind(&reader.phone)
            .bind(&reader.address)
            .bind(reader.birth_date);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

pub async fn seed_employees(
    db: &PgPool,
    count: usize,
    base: u64,
    credential_hash: &str,
) -> Result<Vec<EmployeeId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗂️  Seeding {count} employees...");

    let employees = generate_employees(count, base, credential_hash);

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(employees.len());
    // 7 params per employee
    for chunk in employees.chunks(1000) {
        ids.extend(insert_employees_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!("   ✓ Inserted {} employees in {:?}", ids.len(), start_time.elapsed());
    Ok(ids)
}

async fn insert_employees_chunk(
    tx: &mut Transaction<'_, Postgres>,
    employees: &[EmployeeSeed],
) -> Result<Vec<EmployeeId>, Box<dyn std::error::Error>> {
    if employees.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO employees \
         (name, email, credential_hash, phone, national_id, address, birth_date) VALUES ",
    );
    for i in 0..employees.len() {
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
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, EmployeeId>(&query);
    for employee in employees {
        q = q
            .bind(&employee.name)
            .bind(&employee.email)
            .bind(&employee.credential_hash)
            .bind(&employee.phone)
            .bind(&employee.national_id)
            .bind(&employee.address)
            .bind(employee.birth_date);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}
