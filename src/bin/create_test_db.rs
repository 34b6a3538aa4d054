use std::{
    error::Error,
    path::Path,
    process::exit,
    sync::{Arc, Mutex},
};

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use cashbook_rs::{
    NewTransaction, NewUser, PasswordHash, Role, SQLiteTransactionStore, SQLiteUserStore,
    TransactionStore, TransactionType, UserStore, ValidatedPassword, initialize_db,
};

/// A utility for creating a test database for the REST API server of cashbook_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
///
/// Both test users have the password "test".
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    initialize_db(&conn)?;

    let conn = Arc::new(Mutex::new(conn));
    let user_store = SQLiteUserStore::new(conn.clone());
    let transaction_store = SQLiteTransactionStore::new(conn);

    println!("Creating test users...");

    let admin = user_store.create(NewUser {
        name: "Test Admin".to_owned(),
        email: "admin@example.com".to_owned(),
        phone: None,
        role: Role::Admin,
        password_hash: test_password_hash()?,
    })?;

    user_store.create(NewUser {
        name: "Test User".to_owned(),
        email: "user@example.com".to_owned(),
        phone: Some("+34 600 000 000".to_owned()),
        role: Role::User,
        password_hash: test_password_hash()?,
    })?;

    println!("Creating test transactions...");

    let now = OffsetDateTime::now_utc();
    let samples = [
        ("Venta de mercadería", 1500.0, 95, TransactionType::Income),
        ("Alquiler", 600.0, 90, TransactionType::Expense),
        ("Servicios", 120.75, 60, TransactionType::Expense),
        ("Consultoría", 900.0, 45, TransactionType::Income),
        ("Insumos", 80.5, 20, TransactionType::Expense),
        ("Venta online", 430.0, 3, TransactionType::Income),
    ];

    for (concept, amount, days_ago, transaction_type) in samples {
        transaction_store.create(NewTransaction {
            concept: concept.to_owned(),
            amount,
            date: now - Duration::days(days_ago),
            transaction_type,
            user_id: admin.id,
        })?;
    }

    println!("Success!");

    Ok(())
}

fn test_password_hash() -> Result<PasswordHash, cashbook_rs::Error> {
    PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )
}
