use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;

use libris_cli::employees::{NewEmployee, create_employee, parse_date};
use libris_cli::seeder::{self, SeedConfig};
use libris_db::{init_db_pool, mark_overdue_loans};

#[derive(Parser)]
#[command(name = "libris-cli")]
#[command(about = "Libris CLI - Administrative tools for Libris", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an employee account (prompts for anything not given)
    CreateEmployee {
        #[arg(short = 'n', long)]
        name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        national_id: Option<String>,

        #[arg(long)]
        address: Option<String>,

        /// YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        birth_date: Option<NaiveDate>,
    },
    /// Mark open loans past their due date as overdue
    RefreshOverdue {
        /// Reference date, YYYY-MM-DD (defaults to today)
        #[arg(long, value_parser = parse_date)]
        as_of: Option<NaiveDate>,
    },
    /// Seed the database with fake books, readers, employees and loans
    Seed {
        #[arg(short = 'b', long, default_value = "200")]
        books: usize,

        #[arg(short = 'r', long, default_value = "50")]
        readers: usize,

        #[arg(short = 'e', long, default_value = "5")]
        employees: usize,

        /// At most one loan per seeded book
        #[arg(short = 'l', long, default_value = "120")]
        loans: usize,
    },
    /// Remove all seeded data
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = match init_db_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    let today = Local::now().date_naive();

    let result = match cli.command {
        Commands::CreateEmployee {
            name,
            email,
            password,
            phone,
            national_id,
            address,
            birth_date,
        } => {
            handle_create_employee(
                &pool,
                name,
                email,
                password,
                phone,
                national_id,
                address,
                birth_date,
            )
            .await
        }
        Commands::RefreshOverdue { as_of } => {
            handle_refresh_overdue(&pool, as_of.unwrap_or(today), today).await
        }
        Commands::Seed {
            books,
            readers,
            employees,
            loans,
        } => seeder::seed_all(&pool, SeedConfig::new(books, readers, employees, loans), today).await,
        Commands::ClearSeed => seeder::clear_all(&pool).await,
    };

    if let Err(e) = result {
        eprintln!("\n❌ {e}");
        std::process::exit(1);
    }
}

fn prompt(label: &str, given: Option<String>) -> Result<String, dialoguer::Error> {
    match given {
        Some(value) => Ok(value),
        None => Input::new().with_prompt(label).interact_text(),
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_create_employee(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    phone: Option<String>,
    national_id: Option<String>,
    address: Option<String>,
    birth_date: Option<NaiveDate>,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = prompt("Full name", name)?;
    let email = prompt("Email address", email)?;
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };
    let phone = prompt("Phone", phone)?;
    let national_id = prompt("National ID", national_id)?;
    let address = prompt("Address", address)?;
    let birth_date = match birth_date {
        Some(date) => date,
        None => {
            let raw: String = Input::new()
                .with_prompt("Birth date (YYYY-MM-DD)")
                .validate_with(|input: &String| parse_date(input).map(|_| ()))
                .interact_text()?;
            parse_date(&raw)?
        }
    };

    let employee = NewEmployee {
        name,
        email,
        password,
        phone,
        national_id,
        address,
        birth_date,
    };
    let id = create_employee(pool, &employee).await?;

    println!("\n✅ Employee created successfully!");
    println!("   ID: {id}");
    println!("   Email: {}", employee.email.trim().to_lowercase());
    println!("   Name: {}", employee.name.trim());

    Ok(())
}

async fn handle_refresh_overdue(
    pool: &PgPool,
    as_of: NaiveDate,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    if as_of > today {
        return Err(format!("--as-of {as_of} is after today ({today})").into());
    }
    let updated = mark_overdue_loans(pool, as_of).await?;
    println!("✅ Marked {updated} loan(s) overdue as of {as_of}");
    Ok(())
}
